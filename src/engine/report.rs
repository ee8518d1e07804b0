//! Report assembly over all observed label pairs
//!
//! Fans the signal → filter → correlation pipeline out over the cross
//! product of meal and symptom labels and shapes the serializable output
//! records consumed by the analyzer binary.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use super::correlate::{cross_correlation, delay_histogram, DelayHistogram};
use super::filter::low_pass_filter;
use super::labels::{expand_composite, expand_single, RawEvent};
use super::signal::{build_indicator, TimeGrid};
use crate::config::AnalysisConfig;
use crate::store::models::{Meal, Symptom};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Cross-correlation table for one (meal label, symptom label) pair.
/// `lags` and `correlations` are parallel arrays, lags ascending.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationRecord {
    pub meal_label: String,
    pub symptom_label: String,
    pub lags: Vec<i64>,
    pub correlations: Vec<f64>,
}

/// Meal and symptom entry counts per calendar day, zero-filled across the
/// whole range.
#[derive(Debug, Clone, Serialize)]
pub struct DailyCounts {
    pub days: Vec<String>,
    pub meals: Vec<u64>,
    pub symptoms: Vec<u64>,
}

/// One meal paired with the first symptom recorded after it, if any.
#[derive(Debug, Clone, Serialize)]
pub struct MealSymptomPairing {
    pub meal_id: i64,
    pub meal_items: String,
    pub meal_timestamp: String,
    pub next_symptom_id: Option<i64>,
    pub next_symptom_desc: Option<String>,
    pub time_diff_hours: Option<f64>,
}

/// Complete analysis output for one date range.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub start: String,
    pub end: String,
    pub correlations: Vec<CorrelationRecord>,
    pub delay_histogram: DelayHistogram,
    pub daily_counts: DailyCounts,
    pub meal_pairings: Vec<MealSymptomPairing>,
}

/// Build one correlation record per (meal label, symptom label) pair that
/// had at least one event inside `[start, end]`.
///
/// The symptom batch may extend past `end` (it is shared with the delay
/// histogram); extended-window events are ignored here so that a label
/// observed only after the range cannot invent pairs.
pub fn build_correlation_records(
    meals: &[RawEvent],
    symptoms: &[RawEvent],
    start: NaiveDate,
    end: NaiveDate,
    config: &AnalysisConfig,
) -> Vec<CorrelationRecord> {
    let grid = TimeGrid::new(start, end);

    let in_range: Vec<RawEvent> = symptoms
        .iter()
        .filter(|e| {
            let day = e.timestamp.date_naive();
            day >= start && day <= end
        })
        .cloned()
        .collect();

    let meal_signals = filtered_signals(expand_composite(meals), &grid, config.tau_minutes);
    let symptom_signals = filtered_signals(expand_single(&in_range), &grid, config.tau_minutes);

    let mut records = Vec::with_capacity(meal_signals.len() * symptom_signals.len());
    for (meal_label, meal_signal) in &meal_signals {
        for (symptom_label, symptom_signal) in &symptom_signals {
            let corr = cross_correlation(meal_signal, symptom_signal, config.max_lag_minutes);
            records.push(CorrelationRecord {
                meal_label: meal_label.clone(),
                symptom_label: symptom_label.clone(),
                lags: corr.lags,
                correlations: corr.values,
            });
        }
    }
    records
}

fn filtered_signals(
    streams: BTreeMap<String, Vec<chrono::DateTime<chrono::Utc>>>,
    grid: &TimeGrid,
    tau_minutes: f64,
) -> BTreeMap<String, Vec<f64>> {
    streams
        .into_iter()
        .map(|(label, times)| {
            let indicator = build_indicator(grid, &times);
            (label, low_pass_filter(&indicator, tau_minutes))
        })
        .collect()
}

/// Delay histogram from every meal to its nearest following symptom of any
/// label, over the raw (unfiltered) event timestamps.
pub fn build_delay_histogram(
    meals: &[RawEvent],
    symptoms: &[RawEvent],
    bin_size_minutes: f64,
) -> DelayHistogram {
    let meal_times: Vec<_> = meals.iter().map(|e| e.timestamp).collect();
    let symptom_times: Vec<_> = symptoms.iter().map(|e| e.timestamp).collect();
    delay_histogram(&meal_times, &symptom_times, bin_size_minutes)
}

/// Per-day entry counts for both categories, one slot per calendar day in
/// `[start, end]`, days ascending. Events outside the range (the extended
/// symptom batch) are not counted.
pub fn daily_counts(
    meals: &[RawEvent],
    symptoms: &[RawEvent],
    start: NaiveDate,
    end: NaiveDate,
) -> DailyCounts {
    let mut meal_days: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for event in meals {
        *meal_days.entry(event.timestamp.date_naive()).or_insert(0) += 1;
    }
    let mut symptom_days: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for event in symptoms {
        *symptom_days.entry(event.timestamp.date_naive()).or_insert(0) += 1;
    }

    let mut counts = DailyCounts {
        days: Vec::new(),
        meals: Vec::new(),
        symptoms: Vec::new(),
    };
    for day in start.iter_days() {
        if day > end {
            break;
        }
        counts.days.push(day.format(DATE_FORMAT).to_string());
        counts.meals.push(meal_days.get(&day).copied().unwrap_or(0));
        counts
            .symptoms
            .push(symptom_days.get(&day).copied().unwrap_or(0));
    }
    counts
}

/// Pair each meal with the first symptom recorded strictly after it.
/// Meals with no later symptom keep `None` in the symptom fields; they are
/// listed, not dropped, so the table always has one row per meal.
pub fn next_symptom_pairings(meals: &[Meal], symptoms: &[Symptom]) -> Vec<MealSymptomPairing> {
    let mut ordered: Vec<&Symptom> = symptoms.iter().collect();
    ordered.sort_by_key(|s| s.timestamp);

    meals
        .iter()
        .map(|meal| {
            let next = ordered.iter().find(|s| s.timestamp > meal.timestamp);
            MealSymptomPairing {
                meal_id: meal.id,
                meal_items: meal.items.clone(),
                meal_timestamp: meal.timestamp.format(DISPLAY_FORMAT).to_string(),
                next_symptom_id: next.map(|s| s.id),
                next_symptom_desc: next.map(|s| s.description.clone()),
                time_diff_hours: next
                    .map(|s| (s.timestamp - meal.timestamp).num_seconds() as f64 / 3600.0),
            }
        })
        .collect()
}

/// Assemble the full analysis report for one date range.
///
/// `meals` holds the entries inside `[start, end]`; `symptoms` holds the
/// extended batch reaching past `end` by the configured lookahead, which
/// the delay histogram and pairing table need to find next-day symptoms.
pub fn build_report(
    meals: &[Meal],
    symptoms: &[Symptom],
    start: NaiveDate,
    end: NaiveDate,
    config: &AnalysisConfig,
) -> AnalysisReport {
    let meal_events: Vec<RawEvent> = meals.iter().map(Meal::as_event).collect();
    let symptom_events: Vec<RawEvent> = symptoms.iter().map(Symptom::as_event).collect();

    AnalysisReport {
        start: start.format(DATE_FORMAT).to_string(),
        end: end.format(DATE_FORMAT).to_string(),
        correlations: build_correlation_records(&meal_events, &symptom_events, start, end, config),
        delay_histogram: build_delay_histogram(
            &meal_events,
            &symptom_events,
            config.bin_size_minutes,
        ),
        daily_counts: daily_counts(&meal_events, &symptom_events, start, end),
        meal_pairings: next_symptom_pairings(meals, symptoms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn ts(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, min, 0).unwrap()
    }

    fn test_config() -> AnalysisConfig {
        AnalysisConfig {
            tau_minutes: 30.0,
            max_lag_minutes: 120,
            bin_size_minutes: 15.0,
            lookahead_days: 7,
        }
    }

    #[test]
    fn test_cross_product_enumeration() {
        let meals = vec![
            RawEvent::new(ts(1, 8, 0), "bread, cheese"),
            RawEvent::new(ts(1, 20, 0), "milk"),
        ];
        let symptoms = vec![
            RawEvent::new(ts(1, 9, 0), "headache"),
            RawEvent::new(ts(2, 7, 0), "nausea"),
        ];

        let records =
            build_correlation_records(&meals, &symptoms, date(1), date(2), &test_config());

        assert_eq!(records.len(), 6);
        let pairs: Vec<(String, String)> = records
            .iter()
            .map(|r| (r.meal_label.clone(), r.symptom_label.clone()))
            .collect();
        assert!(pairs.contains(&("bread".to_string(), "headache".to_string())));
        assert!(pairs.contains(&("milk".to_string(), "nausea".to_string())));
        for record in &records {
            assert_eq!(record.lags.len(), 241);
            assert_eq!(record.correlations.len(), 241);
        }
    }

    #[test]
    fn test_labels_split_from_same_meal_correlate_identically() {
        let meals = vec![RawEvent::new(ts(1, 8, 0), "bread, cheese")];
        let symptoms = vec![RawEvent::new(ts(1, 9, 0), "headache")];

        let records =
            build_correlation_records(&meals, &symptoms, date(1), date(1), &test_config());

        let bread = records.iter().find(|r| r.meal_label == "bread").unwrap();
        let cheese = records.iter().find(|r| r.meal_label == "cheese").unwrap();
        assert_eq!(bread.correlations, cheese.correlations);
    }

    #[test]
    fn test_extended_window_symptom_creates_no_pair() {
        let meals = vec![RawEvent::new(ts(1, 8, 0), "bread")];
        // Only symptom sits past the query end, inside the lookahead.
        let symptoms = vec![RawEvent::new(ts(3, 9, 0), "nausea")];

        let records =
            build_correlation_records(&meals, &symptoms, date(1), date(2), &test_config());
        assert!(records.is_empty());

        // The histogram still sees it.
        let hist = build_delay_histogram(&meals, &symptoms, 15.0);
        assert_eq!(hist.total(), 1);
    }

    #[test]
    fn test_daily_counts_zero_filled() {
        let meals = vec![
            RawEvent::new(ts(1, 8, 0), "bread"),
            RawEvent::new(ts(1, 20, 0), "milk"),
            RawEvent::new(ts(3, 12, 0), "cheese"),
        ];
        let symptoms = vec![RawEvent::new(ts(2, 9, 0), "headache")];

        let counts = daily_counts(&meals, &symptoms, date(1), date(3));

        assert_eq!(counts.days, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
        assert_eq!(counts.meals, vec![2, 0, 1]);
        assert_eq!(counts.symptoms, vec![0, 1, 0]);
    }

    #[test]
    fn test_pairings_find_first_following_symptom() {
        let meals = vec![
            Meal {
                id: 1,
                items: "bread".to_string(),
                timestamp: ts(1, 8, 0),
                note: String::new(),
            },
            Meal {
                id: 2,
                items: "milk".to_string(),
                timestamp: ts(2, 20, 0),
                note: String::new(),
            },
        ];
        let symptoms = vec![
            Symptom {
                id: 10,
                description: "nausea".to_string(),
                timestamp: ts(2, 7, 0),
                note: String::new(),
            },
            Symptom {
                id: 11,
                description: "headache".to_string(),
                timestamp: ts(1, 9, 0),
                note: String::new(),
            },
        ];

        let pairings = next_symptom_pairings(&meals, &symptoms);

        assert_eq!(pairings.len(), 2);
        assert_eq!(pairings[0].next_symptom_id, Some(11));
        assert_eq!(pairings[0].next_symptom_desc.as_deref(), Some("headache"));
        assert_eq!(pairings[0].time_diff_hours, Some(1.0));
        assert_eq!(pairings[0].meal_timestamp, "2024-01-01 08:00");

        // No symptom follows the second meal.
        assert_eq!(pairings[1].next_symptom_id, None);
        assert_eq!(pairings[1].time_diff_hours, None);
    }

    #[test]
    fn test_empty_inputs_empty_report() {
        let report = build_report(&[], &[], date(1), date(7), &test_config());

        assert!(report.correlations.is_empty());
        assert!(report.delay_histogram.bins.is_empty());
        assert!(report.delay_histogram.counts.is_empty());
        assert!(report.meal_pairings.is_empty());
        assert_eq!(report.daily_counts.days.len(), 7);
        assert!(report.daily_counts.meals.iter().all(|&c| c == 0));
    }
}
