use std::path::Path;

use tracing::debug;
use vehicle_inspect_application::{ApplicationError, PhotoScanSummary, PhotoScanner, ScannedPhoto};
use vehicle_inspect_domain::{detect_image_kind, ImageKind, ImageRef, PhotoKind};
use walkdir::WalkDir;

/// Finds inspection photos laid out as `<type>_<side>.<ext>` or
/// `<type>/<side>.<ext>` below a folder, in file-name order.
#[derive(Debug, Default)]
pub struct WalkdirPhotoScanner;

impl PhotoScanner for WalkdirPhotoScanner {
    fn scan_photos(&self, folder: &str) -> Result<PhotoScanSummary, ApplicationError> {
        let folder_path = Path::new(folder);
        if !folder_path.is_dir() {
            return Err(ApplicationError::InvalidInput(format!(
                "folder does not exist or is not a directory: {folder}"
            )));
        }

        let mut summary = PhotoScanSummary::default();

        for entry in WalkDir::new(folder_path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_file() {
                continue;
            }

            summary.scanned_files += 1;
            let file_path = entry.path();
            if detect_image_kind(file_path) == ImageKind::Unsupported {
                continue;
            }

            let Some((kind, side)) = classify(file_path) else {
                debug!(path = %file_path.display(), "file name does not name a photo type and side");
                continue;
            };

            let canonical = file_path
                .canonicalize()
                .map_err(|error| ApplicationError::Io(error.to_string()))?;
            summary.photos.push(ScannedPhoto {
                image: ImageRef::Uri(format!("file://{}", canonical.display())),
                source_path: canonical,
                side,
                kind,
            });
        }

        Ok(summary)
    }
}

fn classify(path: &Path) -> Option<(PhotoKind, String)> {
    let stem = path.file_stem()?.to_str()?;

    if let Some((kind, side)) = stem.split_once('_') {
        if let Ok(kind) = kind.parse::<PhotoKind>() {
            if !side.is_empty() {
                return Some((kind, side.to_string()));
            }
        }
    }

    let parent = path.parent()?.file_name()?.to_str()?;
    let kind = parent.parse::<PhotoKind>().ok()?;
    Some((kind, stem.to_string()))
}
