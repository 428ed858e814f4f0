use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{DomainError, ImageRef, Results};

macro_rules! string_id {
    ($name:ident, $kind:literal, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(DomainError::EmptyIdentifier($kind));
                }
                Ok(Self(value))
            }

            /// Prefixed id around a generated suffix; never blank.
            pub fn generated(suffix: impl Display) -> Self {
                Self(format!("{}{suffix}", Self::PREFIX))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(InspectionId, "inspection", "ins_");
string_id!(PhotoId, "photo", "p_");
string_id!(IssueId, "issue", "iss_");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoKind {
    Pickup,
    Return,
}

impl PhotoKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::Return => "return",
        }
    }
}

impl FromStr for PhotoKind {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pickup" => Ok(Self::Pickup),
            "return" => Ok(Self::Return),
            other => Err(DomainError::UnknownPhotoKind(other.to_string())),
        }
    }
}

impl Display for PhotoKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub id: PhotoId,
    /// Free-form, case-sensitive side label ("front", "left", ...).
    pub side: String,
    pub kind: PhotoKind,
    pub image: ImageRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Inspection {
    pub id: InspectionId,
    pub created_at: String,
    pub photos: Vec<Photo>,
    pub results: Option<Results>,
}

impl Inspection {
    pub fn new(id: InspectionId, created_at: String) -> Self {
        Self {
            id,
            created_at,
            photos: Vec::new(),
            results: None,
        }
    }

    pub fn photos_of_kind(&self, kind: PhotoKind) -> impl Iterator<Item = &Photo> {
        self.photos.iter().filter(move |photo| photo.kind == kind)
    }

    pub fn return_photos(&self) -> impl Iterator<Item = &Photo> {
        self.photos_of_kind(PhotoKind::Return)
    }

    pub fn find_photo(&self, photo_id: &PhotoId) -> Option<&Photo> {
        self.photos.iter().find(|photo| &photo.id == photo_id)
    }
}
