use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    EmptyIdentifier(&'static str),
    UnknownPhotoKind(String),
    InvalidCostModel(String),
    AmbiguousPickupSide { side: String, candidates: usize },
    InvalidImageDimensions { width: u32, height: u32 },
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyIdentifier(kind) => write!(f, "{kind} id must not be empty"),
            Self::UnknownPhotoKind(value) => {
                write!(f, "photo type must be pickup or return, got {value:?}")
            }
            Self::InvalidCostModel(msg) => write!(f, "invalid cost model: {msg}"),
            Self::AmbiguousPickupSide { side, candidates } => write!(
                f,
                "side {side:?} has {candidates} pickup photos, expected exactly one"
            ),
            Self::InvalidImageDimensions { width, height } => {
                write!(f, "image dimensions must be positive, got {width}x{height}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
