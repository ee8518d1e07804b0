//! Idempotent schema migrations from a directory of SQL files

use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

use super::StoreError;

/// Run every `.sql` file in `dir` in file-name order (00_, 01_, ... keeps
/// migrations ordered). Files must use `IF NOT EXISTS` clauses: the loader
/// runs on every startup.
pub fn run_migrations(conn: &Connection, dir: impl AsRef<Path>) -> Result<(), StoreError> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Err(StoreError::MissingMigrations(dir.display().to_string()));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("sql"))
        .collect();
    files.sort();

    log::info!(
        "🔧 Running {} schema migrations from {}",
        files.len(),
        dir.display()
    );
    for path in files {
        let sql = fs::read_to_string(&path)?;
        conn.execute_batch(&sql)?;
        log::debug!("applied migration {}", path.display());
    }
    Ok(())
}
