use rusqlite::{params, Connection, OptionalExtension, Result};

pub struct InspectionRow {
    pub id: String,
    pub created_at: String,
    pub results_json: Option<String>,
}

pub struct PhotoRow {
    pub id: String,
    pub side: String,
    pub kind: String,
    pub mime_type: Option<String>,
    pub image_bytes: Option<Vec<u8>>,
    pub file_name: Option<String>,
    pub image_uri: Option<String>,
}

pub struct SummaryRow {
    pub id: String,
    pub created_at: String,
    pub photo_count: i64,
    pub results_json: Option<String>,
}

pub fn insert_inspection(conn: &Connection, id: &str, created_at: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO inspections (id, created_at, results_json) VALUES (?1, ?2, NULL)",
        params![id, created_at],
    )?;
    Ok(())
}

pub fn find_inspection(conn: &Connection, id: &str) -> Result<Option<InspectionRow>> {
    conn.query_row(
        "SELECT id, created_at, results_json FROM inspections WHERE id = ?1",
        params![id],
        |row| {
            Ok(InspectionRow {
                id: row.get(0)?,
                created_at: row.get(1)?,
                results_json: row.get(2)?,
            })
        },
    )
    .optional()
}

pub fn inspection_exists(conn: &Connection, id: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM inspections WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn list_photos(conn: &Connection, inspection_id: &str) -> Result<Vec<PhotoRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, side, kind, mime_type, image_bytes, file_name, image_uri
         FROM photos
         WHERE inspection_id = ?1
         ORDER BY seq ASC",
    )?;

    let rows = stmt.query_map(params![inspection_id], |row| {
        Ok(PhotoRow {
            id: row.get(0)?,
            side: row.get(1)?,
            kind: row.get(2)?,
            mime_type: row.get(3)?,
            image_bytes: row.get(4)?,
            file_name: row.get(5)?,
            image_uri: row.get(6)?,
        })
    })?;

    rows.collect()
}

/// Appends after the highest existing sequence number for the inspection.
pub fn insert_photo(conn: &Connection, inspection_id: &str, photo: &PhotoRow) -> Result<i64> {
    let seq: i64 = conn.query_row(
        "SELECT COALESCE(MAX(seq) + 1, 0) FROM photos WHERE inspection_id = ?1",
        params![inspection_id],
        |row| row.get(0),
    )?;

    conn.execute(
        "INSERT INTO photos
         (id, inspection_id, seq, side, kind, mime_type, image_bytes, file_name, image_uri)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            photo.id,
            inspection_id,
            seq,
            photo.side,
            photo.kind,
            photo.mime_type,
            photo.image_bytes,
            photo.file_name,
            photo.image_uri,
        ],
    )?;
    Ok(seq)
}

pub fn update_results(conn: &Connection, id: &str, results_json: &str) -> Result<usize> {
    conn.execute(
        "UPDATE inspections SET results_json = ?2 WHERE id = ?1",
        params![id, results_json],
    )
}

pub fn list_summaries(conn: &Connection) -> Result<Vec<SummaryRow>> {
    let mut stmt = conn.prepare(
        "SELECT i.id, i.created_at, COUNT(p.id), i.results_json
         FROM inspections i
         LEFT JOIN photos p ON p.inspection_id = i.id
         GROUP BY i.id
         ORDER BY i.created_at DESC, i.id DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(SummaryRow {
            id: row.get(0)?,
            created_at: row.get(1)?,
            photo_count: row.get(2)?,
            results_json: row.get(3)?,
        })
    })?;

    rows.collect()
}
