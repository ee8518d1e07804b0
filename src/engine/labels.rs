//! Label expansion from raw diary events to per-label timestamp streams

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A single diary event as fetched from storage: when it happened and the
/// raw tag string recorded with it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    pub timestamp: DateTime<Utc>,
    pub label: String,
}

impl RawEvent {
    pub fn new(timestamp: DateTime<Utc>, label: impl Into<String>) -> Self {
        Self {
            timestamp,
            label: label.into(),
        }
    }
}

/// Split composite labels ("bread, cheese") into one timestamp stream per
/// item. Items are trimmed; blank items are dropped, so an event whose tag
/// list is all blanks contributes no stream at all.
pub fn expand_composite(events: &[RawEvent]) -> BTreeMap<String, Vec<DateTime<Utc>>> {
    let mut streams: BTreeMap<String, Vec<DateTime<Utc>>> = BTreeMap::new();
    for event in events {
        for piece in event.label.split(',') {
            let label = piece.trim();
            if label.is_empty() {
                continue;
            }
            streams
                .entry(label.to_string())
                .or_default()
                .push(event.timestamp);
        }
    }
    streams
}

/// Group events by their whole trimmed label (symptom descriptions are a
/// single tag, never a list). Blank labels are dropped.
pub fn expand_single(events: &[RawEvent]) -> BTreeMap<String, Vec<DateTime<Utc>>> {
    let mut streams: BTreeMap<String, Vec<DateTime<Utc>>> = BTreeMap::new();
    for event in events {
        let label = event.label.trim();
        if label.is_empty() {
            continue;
        }
        streams
            .entry(label.to_string())
            .or_default()
            .push(event.timestamp);
    }
    streams
}
