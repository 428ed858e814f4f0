use serde::{Deserialize, Serialize};

use crate::{DomainError, Photo, PhotoKind};

/// How to treat a side that has more than one pickup photo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PairingPolicy {
    /// The earliest pickup photo for the side wins.
    #[default]
    FirstMatch,
    /// Refuse to pair when a side has several pickup candidates.
    RejectAmbiguous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingEntry<'a> {
    Paired {
        return_photo: &'a Photo,
        pickup: &'a Photo,
    },
    Unpaired {
        return_photo: &'a Photo,
    },
}

impl<'a> PairingEntry<'a> {
    pub fn return_photo(&self) -> &'a Photo {
        match self {
            Self::Paired { return_photo, .. } | Self::Unpaired { return_photo } => return_photo,
        }
    }
}

/// Matches every return photo with the pickup photo of the same side.
///
/// Entries come back in return-photo sequence order; unmatched return photos
/// are reported as [`PairingEntry::Unpaired`] rather than dropped.
pub fn pair_photos(
    photos: &[Photo],
    policy: PairingPolicy,
) -> Result<Vec<PairingEntry<'_>>, DomainError> {
    let pickups: Vec<&Photo> = photos
        .iter()
        .filter(|photo| photo.kind == PhotoKind::Pickup)
        .collect();

    photos
        .iter()
        .filter(|photo| photo.kind == PhotoKind::Return)
        .map(|return_photo| {
            let mut candidates = pickups
                .iter()
                .copied()
                .filter(|pickup| pickup.side == return_photo.side);

            let Some(pickup) = candidates.next() else {
                return Ok(PairingEntry::Unpaired { return_photo });
            };

            if policy == PairingPolicy::RejectAmbiguous {
                let extra = candidates.count();
                if extra > 0 {
                    return Err(DomainError::AmbiguousPickupSide {
                        side: return_photo.side.clone(),
                        candidates: extra + 1,
                    });
                }
            }

            Ok(PairingEntry::Paired {
                return_photo,
                pickup,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ImageRef, PhotoId};

    fn photo(id: &str, side: &str, kind: PhotoKind) -> Photo {
        Photo {
            id: PhotoId::new(id).expect("id"),
            side: side.to_string(),
            kind,
            image: ImageRef::Uri(format!("{id}.jpg")),
        }
    }

    fn summarize(entries: &[PairingEntry<'_>]) -> Vec<(String, Option<String>)> {
        entries
            .iter()
            .map(|entry| match entry {
                PairingEntry::Paired {
                    return_photo,
                    pickup,
                } => (return_photo.id.to_string(), Some(pickup.id.to_string())),
                PairingEntry::Unpaired { return_photo } => (return_photo.id.to_string(), None),
            })
            .collect()
    }

    #[test]
    fn pairs_return_photos_by_side() {
        let photos = vec![
            photo("p_1", "front", PhotoKind::Pickup),
            photo("p_2", "left", PhotoKind::Pickup),
            photo("p_3", "left", PhotoKind::Return),
            photo("p_4", "front", PhotoKind::Return),
        ];

        let entries = pair_photos(&photos, PairingPolicy::FirstMatch).expect("pairing");
        assert_eq!(
            summarize(&entries),
            vec![
                ("p_3".to_string(), Some("p_2".to_string())),
                ("p_4".to_string(), Some("p_1".to_string())),
            ]
        );
    }

    #[test]
    fn return_photo_without_pickup_side_is_unpaired() {
        let photos = vec![
            photo("p_1", "front", PhotoKind::Pickup),
            photo("p_2", "rear", PhotoKind::Return),
            photo("p_3", "Front", PhotoKind::Return),
        ];

        let entries = pair_photos(&photos, PairingPolicy::FirstMatch).expect("pairing");
        assert_eq!(
            summarize(&entries),
            vec![("p_2".to_string(), None), ("p_3".to_string(), None)]
        );
    }

    #[test]
    fn first_pickup_wins_under_first_match() {
        let photos = vec![
            photo("p_1", "front", PhotoKind::Pickup),
            photo("p_2", "front", PhotoKind::Pickup),
            photo("p_3", "front", PhotoKind::Return),
        ];

        let entries = pair_photos(&photos, PairingPolicy::FirstMatch).expect("pairing");
        assert_eq!(
            summarize(&entries),
            vec![("p_3".to_string(), Some("p_1".to_string()))]
        );
    }

    #[test]
    fn reject_ambiguous_fails_on_duplicate_pickup_side() {
        let photos = vec![
            photo("p_1", "front", PhotoKind::Pickup),
            photo("p_2", "front", PhotoKind::Pickup),
            photo("p_3", "front", PhotoKind::Return),
        ];

        let result = pair_photos(&photos, PairingPolicy::RejectAmbiguous);
        assert_eq!(
            result,
            Err(DomainError::AmbiguousPickupSide {
                side: "front".to_string(),
                candidates: 2,
            })
        );
    }

    #[test]
    fn reject_ambiguous_ignores_sides_without_return_photos() {
        let photos = vec![
            photo("p_1", "rear", PhotoKind::Pickup),
            photo("p_2", "rear", PhotoKind::Pickup),
            photo("p_3", "front", PhotoKind::Pickup),
            photo("p_4", "front", PhotoKind::Return),
        ];

        let entries = pair_photos(&photos, PairingPolicy::RejectAmbiguous).expect("pairing");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].return_photo().id.as_str(), "p_4");
    }

    #[test]
    fn no_photos_yields_no_entries() {
        let entries = pair_photos(&[], PairingPolicy::FirstMatch).expect("pairing");
        assert!(entries.is_empty());
    }
}
