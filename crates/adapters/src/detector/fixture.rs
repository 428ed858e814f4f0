use std::collections::HashMap;
use std::fs;
use std::path::Path;

use vehicle_inspect_application::{ApplicationError, DamageDetector};
use vehicle_inspect_domain::{Detection, ImageRef};

/// Canned detections keyed by image file name or full URI. Images without
/// an entry fail detection.
#[derive(Debug, Clone, Default)]
pub struct FixtureDamageDetector {
    responses: HashMap<String, Vec<Detection>>,
}

impl FixtureDamageDetector {
    pub fn from_path(path: &Path) -> Result<Self, ApplicationError> {
        let contents = fs::read_to_string(path).map_err(|error| {
            ApplicationError::Io(format!("failed to read {}: {error}", path.display()))
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, ApplicationError> {
        let responses = serde_json::from_str(json).map_err(|error| {
            ApplicationError::InvalidInput(format!("invalid detection fixture: {error}"))
        })?;
        Ok(Self { responses })
    }
}

impl DamageDetector for FixtureDamageDetector {
    fn detect(&self, image: &ImageRef) -> Result<Vec<Detection>, ApplicationError> {
        let by_uri = match image {
            ImageRef::Uri(uri) => self.responses.get(uri),
            ImageRef::Inline { .. } => None,
        };
        by_uri
            .or_else(|| image.file_name().and_then(|name| self.responses.get(name)))
            .cloned()
            .ok_or_else(|| {
                ApplicationError::Detection(format!(
                    "no fixture detections for {}",
                    image.describe()
                ))
            })
    }
}
