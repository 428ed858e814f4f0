use vehicle_inspect_domain::{ImageRef, InspectionId, PhotoKind};

#[derive(Debug, Clone, Default)]
pub struct BootstrapStoreCommand;

#[derive(Debug, Clone, Default)]
pub struct CreateInspectionCommand;

/// Upload of a single photo. Missing side and type fall back to
/// `"unknown"` and pickup; a missing image is rejected.
#[derive(Debug, Clone)]
pub struct AddPhotoCommand {
    pub inspection_id: InspectionId,
    pub side: Option<String>,
    pub kind: Option<PhotoKind>,
    pub image: Option<ImageRef>,
}

#[derive(Debug, Clone)]
pub struct ImportPhotosCommand {
    pub inspection_id: InspectionId,
    pub folder: String,
}

#[derive(Debug, Clone)]
pub struct AnalyzeInspectionCommand {
    pub inspection_id: InspectionId,
}

#[derive(Debug, Clone)]
pub struct AnnotateInspectionCommand {
    pub inspection_id: InspectionId,
}

#[derive(Debug, Clone)]
pub struct ShowInspectionCommand {
    pub inspection_id: InspectionId,
}

#[derive(Debug, Clone, Default)]
pub struct ListInspectionsCommand;
