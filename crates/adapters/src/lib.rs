pub mod detector;
pub mod fs;
pub mod ids;
pub mod migrations;
pub mod presenters;
pub mod raster;
pub mod source;
pub mod sqlite;

pub use detector::{
    BoxUnits, FixtureDamageDetector, HttpDamageDetector, HttpDetectorConfig,
    DEFAULT_DETECTOR_ENDPOINT,
};
pub use fs::{SystemClock, WalkdirPhotoScanner};
pub use ids::UuidIdGenerator;
pub use presenters::{
    analysis_to_json, inspection_to_json, present_inspection_row, present_issue_row,
    present_outcome, present_photo_row, present_total,
};
pub use raster::ImageCrateRaster;
pub use sqlite::SqliteInspectionRepository;
