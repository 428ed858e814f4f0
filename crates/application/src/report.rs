use vehicle_inspect_domain::{DrawInstruction, PhotoId, Results};

use crate::EncodedImage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoMatchingPickup { side: String },
    DetectionFailed { message: String },
}

/// What happened to one return photo during an analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoOutcome {
    Analyzed {
        photo_id: PhotoId,
        issue_count: usize,
    },
    Skipped {
        photo_id: PhotoId,
        reason: SkipReason,
    },
}

impl PhotoOutcome {
    pub fn photo_id(&self) -> &PhotoId {
        match self {
            Self::Analyzed { photo_id, .. } | Self::Skipped { photo_id, .. } => photo_id,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub results: Results,
    pub outcomes: Vec<PhotoOutcome>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub scanned_files: usize,
    pub imported: Vec<PhotoId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedPhoto {
    pub photo_id: PhotoId,
    pub instructions: Vec<DrawInstruction>,
    pub image: EncodedImage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationReport {
    pub overlays: Vec<AnnotatedPhoto>,
    pub total_estimated_cost: u64,
}
