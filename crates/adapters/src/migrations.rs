pub const MIGRATIONS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS inspections (
        id TEXT PRIMARY KEY,
        created_at TEXT NOT NULL,
        results_json TEXT
    );",
    "CREATE TABLE IF NOT EXISTS photos (
        id TEXT PRIMARY KEY,
        inspection_id TEXT NOT NULL REFERENCES inspections(id) ON DELETE CASCADE,
        seq INTEGER NOT NULL,
        side TEXT NOT NULL,
        kind TEXT NOT NULL,
        mime_type TEXT,
        image_bytes BLOB,
        file_name TEXT,
        image_uri TEXT,
        UNIQUE (inspection_id, seq)
    );",
    "CREATE INDEX IF NOT EXISTS idx_photos_inspection_seq ON photos (inspection_id, seq);",
];
