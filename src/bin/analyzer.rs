//! Analyzer Binary - Meal/Symptom Correlation Report
//!
//! Builds the full analysis report for a date range: per-label-pair lag
//! cross-correlation, the meal→symptom delay histogram, daily entry
//! counts, and the meal→next-symptom pairing table, emitted as JSON.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin analyzer -- --start 2024-01-01 --end 2024-01-31
//! ```
//!
//! ## Environment Variables
//!
//! - SYMFLOW_DB_PATH - SQLite database path (default: data/diary.db)
//! - SYMFLOW_MIGRATIONS_DIR - Schema migration directory (default: migrations)
//! - SYMFLOW_TAU_MINUTES - Smoothing time constant in minutes (default: 30, <= 0 disables smoothing)
//! - SYMFLOW_MAX_LAG_MINUTES - Correlation lag window in minutes (default: 720)
//! - SYMFLOW_BIN_SIZE_MINUTES - Delay histogram bin width in minutes (default: 15)
//! - SYMFLOW_LOOKAHEAD_DAYS - Extra days of symptoms fetched past --end (default: 7)
//! - RUST_LOG - Logging level (optional, default: info)

use chrono::{Days, NaiveDate};
use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use symflow::config::AnalysisConfig;
use symflow::engine::report::build_report;
use symflow::store::DiaryStore;

struct AnalyzerArgs {
    db_path: String,
    start: NaiveDate,
    end: NaiveDate,
    output: Option<String>,
}

fn parse_args() -> Result<AnalyzerArgs, Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let mut db_path =
        env::var("SYMFLOW_DB_PATH").unwrap_or_else(|_| "data/diary.db".to_string());
    let mut start = None;
    let mut end = None;
    let mut output = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" => {
                db_path = flag_value(&args, i, "--db")?;
                i += 2;
            }
            "--start" => {
                start = Some(parse_date(&flag_value(&args, i, "--start")?)?);
                i += 2;
            }
            "--end" => {
                end = Some(parse_date(&flag_value(&args, i, "--end")?)?);
                i += 2;
            }
            "--output" => {
                output = Some(flag_value(&args, i, "--output")?);
                i += 2;
            }
            other => return Err(format!("unknown argument: {}", other).into()),
        }
    }

    Ok(AnalyzerArgs {
        db_path,
        start: start.ok_or("missing required flag: --start YYYY-MM-DD")?,
        end: end.ok_or("missing required flag: --end YYYY-MM-DD")?,
        output,
    })
}

fn flag_value(args: &[String], i: usize, flag: &str) -> Result<String, String> {
    args.get(i + 1)
        .cloned()
        .ok_or_else(|| format!("{} requires a value", flag))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", raw))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    if args.start > args.end {
        return Err(format!("--start {} is after --end {}", args.start, args.end).into());
    }
    let config = AnalysisConfig::from_env()?;

    let store = DiaryStore::open(&args.db_path)?;
    let migrations_dir =
        env::var("SYMFLOW_MIGRATIONS_DIR").unwrap_or_else(|_| "migrations".to_string());
    if Path::new(&migrations_dir).exists() {
        store.run_migrations(&migrations_dir)?;
    } else {
        store.init_schema()?;
    }

    let extended_end = args.end + Days::new(config.lookahead_days as u64);
    let meals = store.meals_in_range(args.start, args.end)?;
    let symptoms = store.symptoms_in_range(args.start, extended_end)?;
    log::info!(
        "📈 Analyzing {} meals and {} symptoms ({} → {}, lookahead {} days)",
        meals.len(),
        symptoms.len(),
        args.start,
        args.end,
        config.lookahead_days
    );

    let report = build_report(&meals, &symptoms, args.start, args.end, &config);
    log::info!(
        "📊 {} label pairs, {} histogram bins",
        report.correlations.len(),
        report.delay_histogram.bins.len()
    );

    match &args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            serde_json::to_writer_pretty(&mut file, &report)?;
            writeln!(file)?;
            log::info!("📝 Report written to {}", path);
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, &report)?;
            writeln!(handle)?;
        }
    }

    Ok(())
}
