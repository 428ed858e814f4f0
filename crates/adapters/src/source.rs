use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;

use vehicle_inspect_application::ApplicationError;
use vehicle_inspect_domain::{detect_image_kind, ImageRef};

/// Resolves a photo URI to a local path. Bare paths and `file://` URIs are
/// accepted; any other scheme is rejected.
pub fn local_path(uri: &str) -> Result<PathBuf, ApplicationError> {
    if let Some(path) = uri.strip_prefix("file://") {
        return Ok(PathBuf::from(path));
    }
    if let Some((scheme, _)) = uri.split_once("://") {
        return Err(ApplicationError::Decode(format!(
            "unsupported image uri scheme '{scheme}' in {uri}"
        )));
    }
    Ok(PathBuf::from(uri))
}

pub fn image_bytes(image: &ImageRef) -> Result<Cow<'_, [u8]>, ApplicationError> {
    match image {
        ImageRef::Inline { bytes, .. } => Ok(Cow::Borrowed(bytes.as_slice())),
        ImageRef::Uri(uri) => {
            let path = local_path(uri)?;
            let bytes = fs::read(&path).map_err(|error| {
                ApplicationError::Io(format!("failed to read {}: {error}", path.display()))
            })?;
            Ok(Cow::Owned(bytes))
        }
    }
}

pub fn mime_type(image: &ImageRef) -> String {
    match image {
        ImageRef::Inline { mime_type, .. } => mime_type.clone(),
        ImageRef::Uri(uri) => detect_image_kind(&PathBuf::from(uri))
            .mime_type()
            .unwrap_or("application/octet-stream")
            .to_string(),
    }
}
