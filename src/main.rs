//! symflow - meal/symptom diary correlation engine
//!
//! Sparse diary events (meals tagged by food item, symptoms tagged by
//! description) become dense minute-grid signals, smoothed into "recent
//! event pressure", then related by lag cross-correlation and delay
//! statistics. Storage is a SQLite diary; the `analyzer` and `diary`
//! binaries are the entry points.

#[cfg(test)]
mod tests;

pub mod config;
pub mod engine;
pub mod export;
pub mod store;

pub use config::AnalysisConfig;
pub use engine::report::AnalysisReport;
pub use store::DiaryStore;
