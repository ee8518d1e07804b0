//! SQLite diary store: CRUD plus range-filtered event queries
//!
//! Timestamps are stored as RFC3339 UTC strings ("2024-01-01T08:00:00Z"),
//! so SQLite's DATE() can range-filter them directly. Rows whose stored
//! timestamp no longer parses are skipped with a warning in list and range
//! queries, never surfaced as an error to the analysis path.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::migrate;
use super::models::{EventCategory, Meal, Symptom};
use super::StoreError;
use crate::engine::labels::RawEvent;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Built-in copy of the schema, so in-memory stores and tests don't
/// depend on the migrations directory existing on disk.
const SCHEMA: &[&str] = &[
    include_str!("../../migrations/01_create_meals.sql"),
    include_str!("../../migrations/02_create_symptoms.sql"),
];

pub struct DiaryStore {
    conn: Connection,
}

impl DiaryStore {
    /// Open (or create) the database file and switch it to WAL mode.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self { conn })
    }

    /// In-memory store for tests and one-off runs.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply schema migrations from a directory of `.sql` files.
    pub fn run_migrations(&self, dir: impl AsRef<Path>) -> Result<(), StoreError> {
        migrate::run_migrations(&self.conn, dir)
    }

    /// Create the schema from the built-in migration copies.
    pub fn init_schema(&self) -> Result<(), StoreError> {
        for sql in SCHEMA {
            self.conn.execute_batch(sql)?;
        }
        Ok(())
    }

    pub fn insert_meal(
        &self,
        items: &str,
        timestamp: DateTime<Utc>,
        note: &str,
    ) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO meals (items, timestamp, note) VALUES (?1, ?2, ?3)",
            params![items, encode_timestamp(timestamp), note],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn update_meal(
        &self,
        id: i64,
        items: &str,
        timestamp: DateTime<Utc>,
        note: &str,
    ) -> Result<bool, StoreError> {
        let changed = self.conn.execute(
            "UPDATE meals SET items = ?1, timestamp = ?2, note = ?3 WHERE id = ?4",
            params![items, encode_timestamp(timestamp), note, id],
        )?;
        Ok(changed > 0)
    }

    pub fn delete_meal(&self, id: i64) -> Result<bool, StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM meals WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    pub fn get_meal(&self, id: i64) -> Result<Option<Meal>, StoreError> {
        let row: Option<(i64, String, String, String)> = self
            .conn
            .query_row(
                "SELECT id, items, timestamp, note FROM meals WHERE id = ?1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        match row {
            Some((id, items, raw_ts, note)) => {
                let timestamp = decode_timestamp(&raw_ts)
                    .map_err(|_| StoreError::InvalidTimestamp(raw_ts))?;
                Ok(Some(Meal {
                    id,
                    items,
                    timestamp,
                    note,
                }))
            }
            None => Ok(None),
        }
    }

    /// All meals, newest first.
    pub fn list_meals(&self) -> Result<Vec<Meal>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, items, timestamp, note FROM meals ORDER BY timestamp DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;
        collect_meals(rows)
    }

    /// Meals with DATE(timestamp) inside `[start, end]`, ascending.
    pub fn meals_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Meal>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, items, timestamp, note FROM meals
             WHERE DATE(timestamp) BETWEEN ?1 AND ?2
             ORDER BY timestamp ASC",
        )?;
        let rows = stmt.query_map(
            params![
                start.format(DATE_FORMAT).to_string(),
                end.format(DATE_FORMAT).to_string()
            ],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )?;
        collect_meals(rows)
    }

    pub fn insert_symptom(
        &self,
        description: &str,
        timestamp: DateTime<Utc>,
        note: &str,
    ) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO symptoms (description, timestamp, note) VALUES (?1, ?2, ?3)",
            params![description, encode_timestamp(timestamp), note],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn update_symptom(
        &self,
        id: i64,
        description: &str,
        timestamp: DateTime<Utc>,
        note: &str,
    ) -> Result<bool, StoreError> {
        let changed = self.conn.execute(
            "UPDATE symptoms SET description = ?1, timestamp = ?2, note = ?3 WHERE id = ?4",
            params![description, encode_timestamp(timestamp), note, id],
        )?;
        Ok(changed > 0)
    }

    pub fn delete_symptom(&self, id: i64) -> Result<bool, StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM symptoms WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    pub fn get_symptom(&self, id: i64) -> Result<Option<Symptom>, StoreError> {
        let row: Option<(i64, String, String, String)> = self
            .conn
            .query_row(
                "SELECT id, description, timestamp, note FROM symptoms WHERE id = ?1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        match row {
            Some((id, description, raw_ts, note)) => {
                let timestamp = decode_timestamp(&raw_ts)
                    .map_err(|_| StoreError::InvalidTimestamp(raw_ts))?;
                Ok(Some(Symptom {
                    id,
                    description,
                    timestamp,
                    note,
                }))
            }
            None => Ok(None),
        }
    }

    /// All symptoms, newest first.
    pub fn list_symptoms(&self) -> Result<Vec<Symptom>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, description, timestamp, note FROM symptoms ORDER BY timestamp DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;
        collect_symptoms(rows)
    }

    /// Symptoms with DATE(timestamp) inside `[start, end]`, ascending.
    /// Callers pass an extended `end` (query end + lookahead days) when the
    /// batch feeds the delay histogram.
    pub fn symptoms_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Symptom>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, description, timestamp, note FROM symptoms
             WHERE DATE(timestamp) BETWEEN ?1 AND ?2
             ORDER BY timestamp ASC",
        )?;
        let rows = stmt.query_map(
            params![
                start.format(DATE_FORMAT).to_string(),
                end.format(DATE_FORMAT).to_string()
            ],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )?;
        collect_symptoms(rows)
    }

    /// Range-filtered (timestamp, label) batch for one category, ascending,
    /// as consumed by the analysis engine.
    pub fn fetch_events(
        &self,
        category: EventCategory,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawEvent>, StoreError> {
        match category {
            EventCategory::Meals => Ok(self
                .meals_in_range(start, end)?
                .iter()
                .map(Meal::as_event)
                .collect()),
            EventCategory::Symptoms => Ok(self
                .symptoms_in_range(start, end)?
                .iter()
                .map(Symptom::as_event)
                .collect()),
        }
    }
}

fn encode_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|t| t.with_timezone(&Utc))
}

fn collect_meals(
    rows: impl Iterator<Item = rusqlite::Result<(i64, String, String, String)>>,
) -> Result<Vec<Meal>, StoreError> {
    let mut meals = Vec::new();
    for row in rows {
        let (id, items, raw_ts, note) = row?;
        match decode_timestamp(&raw_ts) {
            Ok(timestamp) => meals.push(Meal {
                id,
                items,
                timestamp,
                note,
            }),
            Err(_) => log::warn!("skipping meal {}: unparseable timestamp '{}'", id, raw_ts),
        }
    }
    Ok(meals)
}

fn collect_symptoms(
    rows: impl Iterator<Item = rusqlite::Result<(i64, String, String, String)>>,
) -> Result<Vec<Symptom>, StoreError> {
    let mut symptoms = Vec::new();
    for row in rows {
        let (id, description, raw_ts, note) = row?;
        match decode_timestamp(&raw_ts) {
            Ok(timestamp) => symptoms.push(Symptom {
                id,
                description,
                timestamp,
                note,
            }),
            Err(_) => log::warn!(
                "skipping symptom {}: unparseable timestamp '{}'",
                id,
                raw_ts
            ),
        }
    }
    Ok(symptoms)
}
