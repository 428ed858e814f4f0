use std::io::Cursor;
use std::time::Duration;

use image::ImageReader;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::debug;
use vehicle_inspect_application::{ApplicationError, DamageDetector};
use vehicle_inspect_domain::{Detection, ImageRef};

use crate::source;

pub const DEFAULT_DETECTOR_ENDPOINT: &str =
    "https://router.huggingface.co/hf-inference/models/facebook/detr-resnet-50";

/// Coordinate space of the boxes an endpoint returns. DETR-style endpoints,
/// including the default one, report pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxUnits {
    Normalized,
    #[default]
    Pixels,
}

#[derive(Debug, Clone)]
pub struct HttpDetectorConfig {
    pub endpoint: String,
    pub token: Option<String>,
    pub timeout: Duration,
    pub box_units: BoxUnits,
}

impl Default for HttpDetectorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_DETECTOR_ENDPOINT.to_string(),
            token: None,
            timeout: Duration::from_secs(30),
            box_units: BoxUnits::Pixels,
        }
    }
}

/// Posts raw image bytes to an object-detection endpoint and reads back a
/// JSON array of `{label, score, box}` entries.
#[derive(Debug)]
pub struct HttpDamageDetector {
    client: Client,
    config: HttpDetectorConfig,
}

impl HttpDamageDetector {
    pub fn new(config: HttpDetectorConfig) -> Result<Self, ApplicationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| ApplicationError::Detection(error.to_string()))?;
        Ok(Self { client, config })
    }
}

impl DamageDetector for HttpDamageDetector {
    fn detect(&self, image: &ImageRef) -> Result<Vec<Detection>, ApplicationError> {
        let bytes = source::image_bytes(image)?;
        let mut request = self
            .client
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, source::mime_type(image))
            .body(bytes.to_vec());
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        debug!(endpoint = %self.config.endpoint, image = %image.describe(), "calling detector");
        let response = request
            .send()
            .map_err(|error| ApplicationError::Detection(error.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|error| ApplicationError::Detection(error.to_string()))?;
        if !status.is_success() {
            return Err(ApplicationError::Detection(format!(
                "detector returned {status}: {}",
                snippet(&body)
            )));
        }

        let detections = parse_detections(&body)?;
        match self.config.box_units {
            BoxUnits::Normalized => Ok(detections),
            BoxUnits::Pixels => {
                let (width, height) = pixel_dimensions(&bytes)?;
                Ok(normalize_detections(detections, width, height))
            }
        }
    }
}

fn parse_detections(body: &str) -> Result<Vec<Detection>, ApplicationError> {
    serde_json::from_str(body).map_err(|error| {
        ApplicationError::Detection(format!(
            "unexpected detector response ({error}): {}",
            snippet(body)
        ))
    })
}

fn normalize_detections(detections: Vec<Detection>, width: u32, height: u32) -> Vec<Detection> {
    detections
        .into_iter()
        .map(|detection| Detection {
            bounding_box: detection.bounding_box.normalized_by(width, height),
            ..detection
        })
        .collect()
}

fn pixel_dimensions(bytes: &[u8]) -> Result<(u32, u32), ApplicationError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|error| ApplicationError::Decode(error.to_string()))?
        .into_dimensions()
        .map_err(|error| ApplicationError::Decode(error.to_string()))
}

fn snippet(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map_or(body.len(), |(index, _)| index);
    &body[..end]
}
