//! End-to-end scenarios driven through the store and the full engine

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::config::AnalysisConfig;
use crate::engine::labels::expand_composite;
use crate::engine::report::build_report;
use crate::engine::signal::{build_indicator, TimeGrid};
use crate::store::{DiaryStore, EventCategory};

fn ts(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

fn seeded_store() -> DiaryStore {
    let store = DiaryStore::open_in_memory().unwrap();
    store.init_schema().unwrap();
    store.insert_meal("bread, cheese", ts(1, 8), "").unwrap();
    store.insert_meal("milk", ts(1, 20), "").unwrap();
    store.insert_symptom("headache", ts(1, 9), "").unwrap();
    store.insert_symptom("nausea", ts(2, 7), "").unwrap();
    store
}

#[test]
fn test_full_scenario_delay_histogram() {
    let store = seeded_store();
    let config = AnalysisConfig::default();

    let meals = store.meals_in_range(date(1), date(2)).unwrap();
    let symptoms = store.symptoms_in_range(date(1), date(9)).unwrap();
    let report = build_report(&meals, &symptoms, date(1), date(2), &config);

    // 08:00 meal -> 09:00 headache is 60 min (bin 4 at 15-minute bins);
    // 20:00 meal -> 07:00 nausea next day is 660 min (bin 44).
    assert_eq!(report.delay_histogram.bins, vec![4, 44]);
    assert_eq!(report.delay_histogram.counts, vec![1, 1]);
}

#[test]
fn test_full_scenario_correlation_records() {
    let store = seeded_store();
    let config = AnalysisConfig::default();

    let meals = store.meals_in_range(date(1), date(2)).unwrap();
    let symptoms = store.symptoms_in_range(date(1), date(9)).unwrap();
    let report = build_report(&meals, &symptoms, date(1), date(2), &config);

    // {bread, cheese, milk} x {headache, nausea}.
    assert_eq!(report.correlations.len(), 6);
    for record in &report.correlations {
        assert_eq!(record.lags.len(), (2 * config.max_lag_minutes + 1) as usize);
        assert!(record
            .correlations
            .iter()
            .all(|v| (-1.0..=1.0).contains(v)));
    }

    // bread and cheese come from the same logged meal, so their signals
    // and hence their correlation tables are identical.
    let bread = report
        .correlations
        .iter()
        .find(|r| r.meal_label == "bread" && r.symptom_label == "headache")
        .unwrap();
    let cheese = report
        .correlations
        .iter()
        .find(|r| r.meal_label == "cheese" && r.symptom_label == "headache")
        .unwrap();
    assert_eq!(bread.correlations, cheese.correlations);
}

#[test]
fn test_indicator_series_identical_for_shared_meal() {
    let store = seeded_store();
    let events = store
        .fetch_events(EventCategory::Meals, date(1), date(2))
        .unwrap();

    let grid = TimeGrid::new(date(1), date(2));
    let streams = expand_composite(&events);
    let bread = build_indicator(&grid, &streams["bread"]);
    let cheese = build_indicator(&grid, &streams["cheese"]);

    assert_eq!(bread, cheese);
    assert_eq!(bread.len(), 2 * 1440);
    assert_eq!(bread[8 * 60], 1.0);
    assert_eq!(bread.iter().sum::<f64>(), 1.0);
}

#[test]
fn test_empty_store_yields_empty_report() {
    let store = DiaryStore::open_in_memory().unwrap();
    store.init_schema().unwrap();
    let config = AnalysisConfig::default();

    let meals = store.meals_in_range(date(1), date(31)).unwrap();
    let symptoms = store.symptoms_in_range(date(1), date(31)).unwrap();
    let report = build_report(&meals, &symptoms, date(1), date(31), &config);

    assert!(report.correlations.is_empty());
    assert!(report.delay_histogram.bins.is_empty());
    assert!(report.delay_histogram.counts.is_empty());
    assert!(report.meal_pairings.is_empty());
}

#[test]
fn test_report_serializes_to_json() {
    let store = seeded_store();
    let config = AnalysisConfig::default();

    let meals = store.meals_in_range(date(1), date(2)).unwrap();
    let symptoms = store.symptoms_in_range(date(1), date(9)).unwrap();
    let report = build_report(&meals, &symptoms, date(1), date(2), &config);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["start"], "2024-01-01");
    assert_eq!(json["end"], "2024-01-02");
    assert_eq!(json["delay_histogram"]["bins"][0], 4);
    assert_eq!(json["daily_counts"]["days"].as_array().unwrap().len(), 2);
    assert_eq!(json["meal_pairings"].as_array().unwrap().len(), 2);
}
