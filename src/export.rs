//! CSV and JSON export of the full diary

use chrono::SecondsFormat;
use serde::Serialize;
use std::io::Write;

use crate::store::models::{Meal, Symptom};

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialization(err)
    }
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "IO error: {}", e),
            ExportError::Serialization(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}

#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    meals: &'a [Meal],
    symptoms: &'a [Symptom],
}

/// Write every entry as one JSON document `{"meals": [...], "symptoms": [...]}`.
pub fn export_json<W: Write>(
    meals: &[Meal],
    symptoms: &[Symptom],
    out: &mut W,
) -> Result<(), ExportError> {
    let doc = ExportDocument { meals, symptoms };
    serde_json::to_writer(&mut *out, &doc)?;
    writeln!(out)?;
    Ok(())
}

/// Write every entry as CSV with the header `type,id,value,timestamp,note`.
/// Meal rows carry the raw items string as `value`, symptom rows the
/// description.
pub fn export_csv<W: Write>(
    meals: &[Meal],
    symptoms: &[Symptom],
    out: &mut W,
) -> Result<(), ExportError> {
    writeln!(out, "type,id,value,timestamp,note")?;
    for meal in meals {
        let ts = meal.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);
        write_csv_row(out, &["meal", &meal.id.to_string(), &meal.items, &ts, &meal.note])?;
    }
    for symptom in symptoms {
        let ts = symptom.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);
        write_csv_row(
            out,
            &[
                "symptom",
                &symptom.id.to_string(),
                &symptom.description,
                &ts,
                &symptom.note,
            ],
        )?;
    }
    Ok(())
}

fn write_csv_row<W: Write>(out: &mut W, fields: &[&str]) -> Result<(), ExportError> {
    let row: Vec<String> = fields.iter().map(|f| csv_escape(f)).collect();
    writeln!(out, "{}", row.join(","))?;
    Ok(())
}

/// Quote a field only when it contains a delimiter, quote, or newline.
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample() -> (Vec<Meal>, Vec<Symptom>) {
        let meals = vec![Meal {
            id: 1,
            items: "bread, cheese".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
            note: String::new(),
        }];
        let symptoms = vec![Symptom {
            id: 2,
            description: "headache".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            note: "said \"ouch\"".to_string(),
        }];
        (meals, symptoms)
    }

    #[test]
    fn test_csv_layout_and_quoting() {
        let (meals, symptoms) = sample();
        let mut out = Vec::new();

        export_csv(&meals, &symptoms, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "type,id,value,timestamp,note");
        assert_eq!(lines[1], "meal,1,\"bread, cheese\",2024-01-01T08:00:00Z,");
        assert_eq!(
            lines[2],
            "symptom,2,headache,2024-01-01T09:00:00Z,\"said \"\"ouch\"\"\""
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let (meals, symptoms) = sample();
        let mut out = Vec::new();

        export_json(&meals, &symptoms, &mut out).unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(doc["meals"][0]["items"], "bread, cheese");
        assert_eq!(doc["symptoms"][0]["description"], "headache");
        assert!(doc["meals"][0]["timestamp"]
            .as_str()
            .unwrap()
            .starts_with("2024-01-01T08:00:00"));
    }

    #[test]
    fn test_empty_export() {
        let mut out = Vec::new();
        export_csv(&[], &[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "type,id,value,timestamp,note\n");
    }
}
