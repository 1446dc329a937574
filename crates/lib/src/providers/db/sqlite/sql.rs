//! # SQLite Specific SQL Queries
//!
//! This module centralizes SQL query strings for the SQLite provider.
//! This makes the core logic cleaner and isolates database-specific syntax.

/// Creates the `image_data` table: one row per distinct image filename ever
/// successfully analyzed. `image_name` is the natural dedup key and
/// `time_added` is assigned by the store at insertion time, never by callers.
pub const CREATE_IMAGE_DATA_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS image_data (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        image_name TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        buildings TEXT,
        description TEXT,
        time_added DATETIME DEFAULT CURRENT_TIMESTAMP
    );
";

/// All table creation statements, in execution order. Shared with the test
/// harness so tests initialize the exact production schema.
pub const ALL_TABLE_CREATION_SQL: &[&str] = &[CREATE_IMAGE_DATA_TABLE];

/// Existence check on the dedup key. Expects one parameter: the exact,
/// case-sensitive image name.
pub const IMAGE_EXISTS: &str = "SELECT COUNT(*) FROM image_data WHERE image_name = ?";

/// Inserts one analyzed image. `time_added` is intentionally absent so the
/// column default applies.
pub const INSERT_IMAGE: &str = "
    INSERT INTO image_data (image_name, title, buildings, description)
    VALUES (?, ?, ?, ?)
";
