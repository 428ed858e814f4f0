use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
    Unsupported,
}

impl ImageKind {
    pub fn mime_type(self) -> Option<&'static str> {
        match self {
            Self::Jpeg => Some("image/jpeg"),
            Self::Png => Some("image/png"),
            Self::Webp => Some("image/webp"),
            Self::Unsupported => None,
        }
    }
}

pub fn detect_image_kind(path: &Path) -> ImageKind {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return ImageKind::Unsupported;
    };

    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => ImageKind::Jpeg,
        "png" => ImageKind::Png,
        "webp" => ImageKind::Webp,
        _ => ImageKind::Unsupported,
    }
}

/// Where a photo's pixels live. Inline images keep the uploaded bytes; URIs
/// point at local files (`file://` or a bare path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    Inline {
        mime_type: String,
        bytes: Vec<u8>,
        file_name: Option<String>,
    },
    Uri(String),
}

impl ImageRef {
    /// The name fixture lookups and presenters address this image by.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::Inline { file_name, .. } => file_name.as_deref(),
            Self::Uri(uri) => uri.rsplit('/').next().filter(|name| !name.is_empty()),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Inline {
                mime_type,
                bytes,
                file_name,
            } => match file_name {
                Some(name) => format!("{name} ({mime_type}, {} bytes)", bytes.len()),
                None => format!("inline {mime_type}, {} bytes", bytes.len()),
            },
            Self::Uri(uri) => uri.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Result<Self, DomainError> {
        if width == 0 || height == 0 {
            return Err(DomainError::InvalidImageDimensions { width, height });
        }
        Ok(Self { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_kind_detection_works() {
        assert_eq!(detect_image_kind(Path::new("front.JPG")), ImageKind::Jpeg);
        assert_eq!(detect_image_kind(Path::new("left.png")), ImageKind::Png);
        assert_eq!(
            detect_image_kind(Path::new("notes.txt")),
            ImageKind::Unsupported
        );
        assert_eq!(detect_image_kind(Path::new("noext")), ImageKind::Unsupported);
    }

    #[test]
    fn uri_file_name_is_last_segment() {
        let image = ImageRef::Uri("file:///photos/return_front.jpg".to_string());
        assert_eq!(image.file_name(), Some("return_front.jpg"));
        assert_eq!(ImageRef::Uri("dir/".to_string()).file_name(), None);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(ImageDimensions::new(640, 480).is_ok());
        assert!(matches!(
            ImageDimensions::new(0, 480),
            Err(DomainError::InvalidImageDimensions { width: 0, .. })
        ));
    }
}
