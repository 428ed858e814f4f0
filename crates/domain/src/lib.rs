mod aggregate;
mod annotation;
mod detection;
mod error;
mod image;
mod inspection;
mod issue;
mod pairing;
mod pricing;

pub use aggregate::total_estimated_cost;
pub use annotation::{
    project_box, project_issues, AnnotationScope, AnnotationSettings, DrawInstruction,
    OverlayGeometry, OverlayShape, StrokeStyle,
};
pub use detection::{BoundingBox, Detection};
pub use error::DomainError;
pub use image::{detect_image_kind, ImageDimensions, ImageKind, ImageRef};
pub use inspection::{Inspection, InspectionId, IssueId, Photo, PhotoId, PhotoKind};
pub use issue::{CostSummary, Issue, Results, Severity};
pub use pairing::{pair_photos, PairingEntry, PairingPolicy};
pub use pricing::{CostBreakdown, CostModel, PricedIssue, SeverityBracket, DEFAULT_BASE_COST};
