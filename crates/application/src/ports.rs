use std::path::PathBuf;

use vehicle_inspect_domain::{
    Detection, DrawInstruction, ImageDimensions, ImageRef, Inspection, InspectionId, IssueId,
    Photo, PhotoId, PhotoKind, Results,
};

use crate::ApplicationError;

#[derive(Debug, Clone)]
pub struct InspectionSummary {
    pub id: InspectionId,
    pub created_at: String,
    pub photo_count: usize,
    pub total_estimated_cost: Option<u64>,
}

/// Storage for inspections. Last write wins per inspection; no transactional
/// guarantees beyond a single call.
pub trait InspectionRepository {
    fn initialize(&self) -> Result<(), ApplicationError>;

    fn create_inspection(&self, inspection: &Inspection) -> Result<(), ApplicationError>;

    fn find_inspection(&self, id: &InspectionId) -> Result<Option<Inspection>, ApplicationError>;

    fn append_photo(&self, id: &InspectionId, photo: &Photo) -> Result<(), ApplicationError>;

    /// Replaces any previous results wholesale.
    fn set_results(&self, id: &InspectionId, results: &Results) -> Result<(), ApplicationError>;

    fn list_inspections(&self) -> Result<Vec<InspectionSummary>, ApplicationError>;
}

/// Black-box damage detector. One call per image, no retries.
pub trait DamageDetector {
    fn detect(&self, image: &ImageRef) -> Result<Vec<Detection>, ApplicationError>;
}

/// Decoded RGBA8 pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterCanvas {
    pub dimensions: ImageDimensions,
    pub rgba: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

pub trait ImageRaster {
    fn decode(&self, image: &ImageRef) -> Result<RasterCanvas, ApplicationError>;

    fn draw(
        &self,
        canvas: &mut RasterCanvas,
        instructions: &[DrawInstruction],
    ) -> Result<(), ApplicationError>;

    fn encode(&self, canvas: &RasterCanvas) -> Result<EncodedImage, ApplicationError>;
}

#[derive(Debug, Clone)]
pub struct ScannedPhoto {
    pub source_path: PathBuf,
    pub side: String,
    pub kind: PhotoKind,
    pub image: ImageRef,
}

#[derive(Debug, Clone, Default)]
pub struct PhotoScanSummary {
    pub scanned_files: usize,
    pub photos: Vec<ScannedPhoto>,
}

pub trait PhotoScanner {
    fn scan_photos(&self, folder: &str) -> Result<PhotoScanSummary, ApplicationError>;
}

pub trait Clock {
    fn now_timestamp_string(&self) -> String;
}

pub trait IdGenerator {
    fn inspection_id(&self) -> InspectionId;

    fn photo_id(&self) -> PhotoId;

    fn issue_id(&self) -> IssueId;
}
