//! SQLite-backed diary storage
//!
//! Meal and symptom entries live in two tables with RFC3339 UTC timestamp
//! strings. The store serves CRUD for the diary binary and the
//! range-filtered event batches the analysis engine consumes, including
//! the extended lookahead query the delay histogram needs.

pub mod migrate;
pub mod models;
pub mod sqlite_store;

pub use migrate::run_migrations;
pub use models::{EventCategory, Meal, Symptom};
pub use sqlite_store::DiaryStore;

#[derive(Debug)]
pub enum StoreError {
    Database(rusqlite::Error),
    Io(std::io::Error),
    InvalidTimestamp(String),
    MissingMigrations(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(err)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Database(e) => write!(f, "Database error: {}", e),
            StoreError::Io(e) => write!(f, "IO error: {}", e),
            StoreError::InvalidTimestamp(raw) => write!(f, "Invalid stored timestamp: {}", raw),
            StoreError::MissingMigrations(dir) => {
                write!(f, "Migrations directory not found: {}", dir)
            }
        }
    }
}

impl std::error::Error for StoreError {}
