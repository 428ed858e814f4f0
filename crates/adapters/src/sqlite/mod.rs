mod queries;

use std::fs;
use std::path::PathBuf;

use rusqlite::Connection;
use tracing::debug;
use vehicle_inspect_application::{ApplicationError, InspectionRepository, InspectionSummary};
use vehicle_inspect_domain::{ImageRef, Inspection, InspectionId, Photo, PhotoId, PhotoKind, Results};

use crate::migrations::MIGRATIONS;
use queries::PhotoRow;

#[derive(Debug, Clone)]
pub struct SqliteInspectionRepository {
    path: PathBuf,
}

impl SqliteInspectionRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn open_connection(&self) -> Result<Connection, ApplicationError> {
        let conn = Connection::open(&self.path).map_err(persistence)?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(persistence)?;
        Ok(conn)
    }
}

fn persistence(error: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::Persistence(error.to_string())
}

impl InspectionRepository for SqliteInspectionRepository {
    fn initialize(&self) -> Result<(), ApplicationError> {
        if self.path.as_os_str().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "catalog path must not be empty".to_string(),
            ));
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|error| ApplicationError::Io(error.to_string()))?;
            }
        }

        let conn = self.open_connection()?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(persistence)?;
        for migration in MIGRATIONS {
            conn.execute_batch(migration).map_err(persistence)?;
        }

        debug!(path = %self.path.display(), "catalog ready");
        Ok(())
    }

    fn create_inspection(&self, inspection: &Inspection) -> Result<(), ApplicationError> {
        let conn = self.open_connection()?;
        queries::insert_inspection(&conn, inspection.id.as_str(), &inspection.created_at)
            .map_err(persistence)?;
        debug!(inspection = %inspection.id, "inserted inspection row");
        Ok(())
    }

    fn find_inspection(&self, id: &InspectionId) -> Result<Option<Inspection>, ApplicationError> {
        let conn = self.open_connection()?;
        let Some(row) = queries::find_inspection(&conn, id.as_str()).map_err(persistence)? else {
            return Ok(None);
        };

        let photos = queries::list_photos(&conn, id.as_str())
            .map_err(persistence)?
            .into_iter()
            .map(photo_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        let results = row
            .results_json
            .as_deref()
            .map(parse_results)
            .transpose()?;

        Ok(Some(Inspection {
            id: InspectionId::new(row.id)?,
            created_at: row.created_at,
            photos,
            results,
        }))
    }

    fn append_photo(&self, id: &InspectionId, photo: &Photo) -> Result<(), ApplicationError> {
        let conn = self.open_connection()?;
        if !queries::inspection_exists(&conn, id.as_str()).map_err(persistence)? {
            return Err(ApplicationError::NotFound(format!(
                "inspection not found for id={id}"
            )));
        }

        let seq = queries::insert_photo(&conn, id.as_str(), &photo_to_row(photo))
            .map_err(persistence)?;
        debug!(inspection = %id, photo = %photo.id, seq, "inserted photo row");
        Ok(())
    }

    fn set_results(&self, id: &InspectionId, results: &Results) -> Result<(), ApplicationError> {
        let results_json = serde_json::to_string(results).map_err(persistence)?;
        let conn = self.open_connection()?;
        let updated = queries::update_results(&conn, id.as_str(), &results_json)
            .map_err(persistence)?;
        if updated == 0 {
            return Err(ApplicationError::NotFound(format!(
                "inspection not found for id={id}"
            )));
        }
        debug!(inspection = %id, bytes = results_json.len(), "stored results");
        Ok(())
    }

    fn list_inspections(&self) -> Result<Vec<InspectionSummary>, ApplicationError> {
        let conn = self.open_connection()?;
        queries::list_summaries(&conn)
            .map_err(persistence)?
            .into_iter()
            .map(|row| {
                let total_estimated_cost = row
                    .results_json
                    .as_deref()
                    .map(parse_results)
                    .transpose()?
                    .map(|results| results.summary.total_estimated_cost);
                Ok(InspectionSummary {
                    id: InspectionId::new(row.id)?,
                    created_at: row.created_at,
                    photo_count: usize::try_from(row.photo_count).unwrap_or_default(),
                    total_estimated_cost,
                })
            })
            .collect()
    }
}

fn parse_results(json: &str) -> Result<Results, ApplicationError> {
    serde_json::from_str(json)
        .map_err(|error| ApplicationError::Persistence(format!("stored results are corrupt: {error}")))
}

fn photo_to_row(photo: &Photo) -> PhotoRow {
    let (mime_type, image_bytes, file_name, image_uri) = match &photo.image {
        ImageRef::Inline {
            mime_type,
            bytes,
            file_name,
        } => (
            Some(mime_type.clone()),
            Some(bytes.clone()),
            file_name.clone(),
            None,
        ),
        ImageRef::Uri(uri) => (None, None, None, Some(uri.clone())),
    };

    PhotoRow {
        id: photo.id.to_string(),
        side: photo.side.clone(),
        kind: photo.kind.as_str().to_string(),
        mime_type,
        image_bytes,
        file_name,
        image_uri,
    }
}

fn photo_from_row(row: PhotoRow) -> Result<Photo, ApplicationError> {
    let image = match row.image_uri {
        Some(uri) => ImageRef::Uri(uri),
        None => ImageRef::Inline {
            mime_type: row
                .mime_type
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            bytes: row.image_bytes.unwrap_or_default(),
            file_name: row.file_name,
        },
    };

    Ok(Photo {
        id: PhotoId::new(row.id)?,
        side: row.side,
        kind: row.kind.parse::<PhotoKind>()?,
        image,
    })
}
