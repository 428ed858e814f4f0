mod error;
mod ports;
mod report;
mod service;
mod use_cases;

pub use error::ApplicationError;
pub use ports::{
    Clock, DamageDetector, EncodedImage, IdGenerator, ImageRaster, InspectionRepository,
    InspectionSummary, PhotoScanSummary, PhotoScanner, RasterCanvas, ScannedPhoto,
};
pub use report::{
    AnalysisReport, AnnotatedPhoto, AnnotationReport, ImportReport, PhotoOutcome, SkipReason,
};
pub use service::{InspectionService, ServiceSettings};
pub use use_cases::{
    AddPhotoCommand, AnalyzeInspectionCommand, AnnotateInspectionCommand, BootstrapStoreCommand,
    CreateInspectionCommand, ImportPhotosCommand, ListInspectionsCommand, ShowInspectionCommand,
};
