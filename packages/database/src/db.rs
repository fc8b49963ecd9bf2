//! Database lifecycle: opening the `SQLite` file and ensuring the schema.

use std::path::Path;

use switchy_database::Database;
use switchy_database_connection::init_sqlite_rusqlite;

use crate::DbError;

/// Default path for the property-history database.
pub const DEFAULT_DB_PATH: &str = "data/killer_listings.db";

/// Opens the database at the path given by the `DATABASE_PATH` environment
/// variable (or [`DEFAULT_DB_PATH`]) and ensures the schema exists.
///
/// # Errors
///
/// Returns [`DbError`] if the database cannot be opened or schema creation
/// fails.
pub async fn open_from_env() -> Result<Box<dyn Database>, DbError> {
    let path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    open_db(Path::new(&path)).await
}

/// Opens (or creates) the `SQLite` database at `path` and ensures the
/// schema exists.
///
/// # Errors
///
/// Returns [`DbError`] if the database cannot be opened or schema creation
/// fails.
pub async fn open_db(path: &Path) -> Result<Box<dyn Database>, DbError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DbError::Open {
            message: e.to_string(),
        })?;
    }

    let db = init_sqlite_rusqlite(Some(path)).map_err(|e| DbError::Open {
        message: e.to_string(),
    })?;

    ensure_schema(db.as_ref()).await?;

    Ok(db)
}

/// Creates all tables and indexes if they don't already exist.
async fn ensure_schema(db: &dyn Database) -> Result<(), DbError> {
    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS properties (
            id            TEXT PRIMARY KEY,
            address       TEXT NOT NULL,
            city          TEXT NOT NULL,
            province      TEXT NOT NULL DEFAULT 'BC',
            postal_code   TEXT,
            latitude      REAL NOT NULL,
            longitude     REAL NOT NULL,
            listing_price REAL,
            history_score TEXT NOT NULL DEFAULT 'CLEAN',
            created_at    TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS incidents (
            id          TEXT PRIMARY KEY,
            property_id TEXT REFERENCES properties(id) ON DELETE CASCADE,
            latitude    REAL NOT NULL,
            longitude   REAL NOT NULL,
            type        TEXT NOT NULL,
            date        TEXT NOT NULL,
            summary     TEXT NOT NULL,
            source_url  TEXT,
            severity    INTEGER NOT NULL,
            created_at  TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_properties_location
         ON properties (latitude, longitude)",
    )
    .await?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_properties_city
         ON properties (city)",
    )
    .await?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_incidents_location
         ON incidents (latitude, longitude)",
    )
    .await?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_incidents_property
         ON incidents (property_id)",
    )
    .await?;

    // Enable foreign key enforcement (SQLite has it off by default)
    db.exec_raw("PRAGMA foreign_keys = ON").await?;

    log::debug!("Database schema ensured");
    Ok(())
}
