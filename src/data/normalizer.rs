//! Raw record normalization
//!
//! Maps heterogeneous country JSON into fixed-shape [`CountryRow`]s.
//! Missing or malformed sub-fields fall back to defaults; only a record that
//! is not a JSON object is dropped.

use crate::constants::NOT_AVAILABLE;
use crate::types::{CountryRow, RawCountryRecord};
use serde_json::{Map, Value};

/// Rows produced from a payload, plus the input positions that were dropped
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizeReport {
    pub rows: Vec<CountryRow>,
    /// Indices (into the input) of records that were not JSON objects
    pub skipped: Vec<usize>,
}

/// Normalize raw records, preserving input order.
pub fn normalize(records: &[RawCountryRecord]) -> Vec<CountryRow> {
    normalize_with_report(records).rows
}

/// Normalize raw records and report which ones were dropped.
///
/// The caller decides how to surface skipped records; this function has no
/// side effects.
pub fn normalize_with_report(records: &[RawCountryRecord]) -> NormalizeReport {
    let mut report = NormalizeReport {
        rows: Vec::with_capacity(records.len()),
        skipped: Vec::new(),
    };

    for (index, record) in records.iter().enumerate() {
        match record.as_object() {
            Some(obj) => report.rows.push(normalize_record(obj)),
            None => report.skipped.push(index),
        }
    }

    report
}

/// Normalize a single country object
pub fn normalize_record(obj: &Map<String, Value>) -> CountryRow {
    let (latitude, longitude) = match coordinates(obj.get("latlng")) {
        Some((lat, lng)) => (Some(lat), Some(lng)),
        None => (None, None),
    };

    CountryRow {
        name: obj
            .get("name")
            .and_then(|name| name.get("common"))
            .and_then(text)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        region: obj
            .get("region")
            .and_then(text)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        population: obj.get("population").and_then(count).unwrap_or(0),
        area: obj.get("area").and_then(non_negative).unwrap_or(0.0),
        border_count: array_len(obj.get("borders")),
        official_language_count: obj
            .get("languages")
            .and_then(Value::as_object)
            .map(|langs| langs.len() as u64)
            .unwrap_or(0),
        timezone_count: array_len(obj.get("timezones")),
        latitude,
        longitude,
    }
}

fn text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// Non-negative integer; non-negative floats are truncated
fn count(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| non_negative(value).map(|n| n.min(u64::MAX as f64) as u64))
}

fn non_negative(value: &Value) -> Option<f64> {
    value.as_f64().filter(|n| n.is_finite() && *n >= 0.0)
}

fn array_len(value: Option<&Value>) -> u64 {
    value
        .and_then(Value::as_array)
        .map(|items| items.len() as u64)
        .unwrap_or(0)
}

/// First two elements of the coordinate pair, both numeric, or nothing
fn coordinates(value: Option<&Value>) -> Option<(f64, f64)> {
    let pair = value?.as_array()?;
    match pair.as_slice() {
        [lat, lng, ..] => Some((lat.as_f64()?, lng.as_f64()?)),
        _ => None,
    }
}
