//! Diary entry types shared between storage, reports, and export

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::labels::RawEvent;

/// A recorded meal entry. `items` is the raw comma-separated food tag
/// list exactly as entered; splitting happens in the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub id: i64,
    pub items: String,
    pub timestamp: DateTime<Utc>,
    pub note: String,
}

/// A recorded symptom entry with a single-tag description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symptom {
    pub id: i64,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub note: String,
}

impl Meal {
    pub fn as_event(&self) -> RawEvent {
        RawEvent::new(self.timestamp, self.items.clone())
    }
}

impl Symptom {
    pub fn as_event(&self) -> RawEvent {
        RawEvent::new(self.timestamp, self.description.clone())
    }
}

/// Selector for range-filtered event queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    Meals,
    Symptoms,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Meals => "meals",
            EventCategory::Symptoms => "symptoms",
        }
    }
}
