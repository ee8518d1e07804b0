//! Diary Binary - record and manage meal/symptom entries
//!
//! ## Usage
//!
//! ```bash
//! diary add-meal --items "bread, cheese" --time 2024-01-01T08:00 [--note "..."]
//! diary add-symptom --description headache --time 2024-01-01T09:00 [--note "..."]
//! diary list
//! diary delete-meal --id 3
//! diary delete-symptom --id 2
//! diary export [--format csv|json] [--output file]
//! ```
//!
//! Entry times are read as `YYYY-MM-DDTHH:MM` and stored in UTC; all
//! normalization to UTC happens here at ingestion, never inside the
//! analysis engine.
//!
//! ## Environment Variables
//!
//! - SYMFLOW_DB_PATH - SQLite database path (default: data/diary.db)
//! - SYMFLOW_MIGRATIONS_DIR - Schema migration directory (default: migrations)
//! - RUST_LOG - Logging level (optional, default: info)

use chrono::{DateTime, NaiveDateTime, Utc};
use std::env;
use std::fs::File;
use std::io;
use std::path::Path;

use symflow::export::{export_csv, export_json};
use symflow::store::DiaryStore;

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let command = match args.get(1) {
        Some(c) => c.as_str(),
        None => return Err(usage().into()),
    };

    let store = open_store()?;
    match command {
        "add-meal" => {
            let items = required_flag(&args, "--items")?;
            let timestamp = parse_entry_time(&required_flag(&args, "--time")?)?;
            let note = optional_flag(&args, "--note").unwrap_or_default();
            let id = store.insert_meal(&items, timestamp, &note)?;
            log::info!("🍽 Added meal {} at {}", id, timestamp.format(DISPLAY_FORMAT));
        }
        "add-symptom" => {
            let description = required_flag(&args, "--description")?;
            let timestamp = parse_entry_time(&required_flag(&args, "--time")?)?;
            let note = optional_flag(&args, "--note").unwrap_or_default();
            let id = store.insert_symptom(&description, timestamp, &note)?;
            log::info!(
                "🤒 Added symptom {} at {}",
                id,
                timestamp.format(DISPLAY_FORMAT)
            );
        }
        "list" => {
            for meal in store.list_meals()? {
                println!(
                    "meal\t{}\t{}\t{}\t{}",
                    meal.id,
                    meal.timestamp.format(DISPLAY_FORMAT),
                    meal.items,
                    meal.note
                );
            }
            for symptom in store.list_symptoms()? {
                println!(
                    "symptom\t{}\t{}\t{}\t{}",
                    symptom.id,
                    symptom.timestamp.format(DISPLAY_FORMAT),
                    symptom.description,
                    symptom.note
                );
            }
        }
        "delete-meal" => {
            let id: i64 = required_flag(&args, "--id")?.parse()?;
            if store.delete_meal(id)? {
                log::info!("🗑 Deleted meal {}", id);
            } else {
                return Err(format!("no meal with id {}", id).into());
            }
        }
        "delete-symptom" => {
            let id: i64 = required_flag(&args, "--id")?.parse()?;
            if store.delete_symptom(id)? {
                log::info!("🗑 Deleted symptom {}", id);
            } else {
                return Err(format!("no symptom with id {}", id).into());
            }
        }
        "export" => {
            let format = optional_flag(&args, "--format").unwrap_or_else(|| "csv".to_string());
            let meals = store.list_meals()?;
            let symptoms = store.list_symptoms()?;
            match optional_flag(&args, "--output") {
                Some(path) => {
                    let mut file = File::create(&path)?;
                    write_export(&format, &meals, &symptoms, &mut file)?;
                    log::info!("📝 Exported {} meals and {} symptoms to {}", meals.len(), symptoms.len(), path);
                }
                None => {
                    let stdout = io::stdout();
                    write_export(&format, &meals, &symptoms, &mut stdout.lock())?;
                }
            }
        }
        other => return Err(format!("unknown command: {}\n{}", other, usage()).into()),
    }

    Ok(())
}

fn open_store() -> Result<DiaryStore, Box<dyn std::error::Error>> {
    let db_path = env::var("SYMFLOW_DB_PATH").unwrap_or_else(|_| "data/diary.db".to_string());
    let store = DiaryStore::open(&db_path)?;
    let migrations_dir =
        env::var("SYMFLOW_MIGRATIONS_DIR").unwrap_or_else(|_| "migrations".to_string());
    if Path::new(&migrations_dir).exists() {
        store.run_migrations(&migrations_dir)?;
    } else {
        store.init_schema()?;
    }
    Ok(store)
}

fn write_export<W: io::Write>(
    format: &str,
    meals: &[symflow::store::Meal],
    symptoms: &[symflow::store::Symptom],
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        "json" => export_json(meals, symptoms, out)?,
        "csv" => export_csv(meals, symptoms, out)?,
        other => return Err(format!("unknown export format: {}", other).into()),
    }
    Ok(())
}

/// Parse a `YYYY-MM-DDTHH:MM` entry time as UTC.
fn parse_entry_time(raw: &str) -> Result<DateTime<Utc>, String> {
    NaiveDateTime::parse_from_str(raw, TIME_FORMAT)
        .map(|t| t.and_utc())
        .map_err(|_| format!("invalid time '{}', expected YYYY-MM-DDTHH:MM", raw))
}

fn required_flag(args: &[String], flag: &str) -> Result<String, String> {
    optional_flag(args, flag).ok_or_else(|| format!("missing required flag: {}", flag))
}

fn optional_flag(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|idx| args.get(idx + 1))
        .cloned()
}

fn usage() -> String {
    "usage: diary <add-meal|add-symptom|list|delete-meal|delete-symptom|export> [flags]"
        .to_string()
}
