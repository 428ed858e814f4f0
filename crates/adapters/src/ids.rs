use uuid::Uuid;
use vehicle_inspect_application::IdGenerator;
use vehicle_inspect_domain::{InspectionId, IssueId, PhotoId};

/// Prefixed random v4 UUIDs, e.g. `ins_6f1c...`.
#[derive(Debug, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn inspection_id(&self) -> InspectionId {
        InspectionId::generated(Uuid::new_v4())
    }

    fn photo_id(&self) -> PhotoId {
        PhotoId::generated(Uuid::new_v4())
    }

    fn issue_id(&self) -> IssueId {
        IssueId::generated(Uuid::new_v4())
    }
}
