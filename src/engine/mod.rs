//! Analysis engine - event-to-signal conversion and correlation
//!
//! Turns sparse, irregularly-timestamped diary events into dense
//! minute-resolution signals and computes the statistics relating meal
//! signals to symptom signals. The engine is pure batch computation: it
//! consumes already-fetched event lists and never touches storage or
//! transport.
//!
//! # Architecture
//!
//! ```text
//! DiaryStore → RawEvent batch per category
//!     ↓
//! labels ("bread, cheese" → one timestamp stream per item)
//!     ↓
//! signal (TimeGrid + dense 0/1 indicator series, 1-minute UTC steps)
//!     ↓
//! filter (causal exponential low-pass, "recent event pressure")
//!     ↓
//! correlate (per-pair lag cross-correlation + delay histogram)
//!     ↓
//! report (AnalysisReport records, serialized by the analyzer binary)
//! ```

pub mod correlate;
pub mod filter;
pub mod labels;
pub mod report;
pub mod signal;

pub use correlate::{cross_correlation, delay_histogram, DelayHistogram, LagCorrelation};
pub use filter::low_pass_filter;
pub use labels::{expand_composite, expand_single, RawEvent};
pub use report::{
    build_report, AnalysisReport, CorrelationRecord, DailyCounts, MealSymptomPairing,
};
pub use signal::{build_indicator, TimeGrid, MINUTES_PER_DAY};
