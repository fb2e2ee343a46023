//! Chart data processing engine
//!
//! Prepares grouped, aggregated and sorted series for the charting and map
//! collaborators. Heavy operations (grouping, aggregation, sorting) are
//! performed here rather than in the render path.

use crate::data::table::{aggregate, group_key};
use crate::types::{ChartConfig, CountryRow, SortOrder};
use serde::Serialize;
use std::collections::HashMap;

/// Processed chart data ready for rendering
#[derive(Clone, Debug, Serialize)]
pub struct ChartData {
    /// Data points with labels and values
    pub points: Vec<ChartPoint>,
    /// Grouping column name
    pub x_label: String,
    /// Value column name
    pub y_label: String,
    /// Maximum value for scaling
    pub max_value: f64,
    /// Minimum value for scaling
    pub min_value: f64,
}

/// A single data point in a chart
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// A country that can be placed on a map
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapPoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub population: u64,
}

/// Process rows into chart-ready format
///
/// This performs:
/// 1. Grouping by the configured column (first-appearance order)
/// 2. Aggregation of values
/// 3. Sorting according to config
/// 4. Truncation to `max_points`
/// 5. Min/max calculation for scaling
pub fn process_chart_data(rows: &[CountryRow], config: &ChartConfig) -> Option<ChartData> {
    let mut group_order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, (usize, Vec<f64>)> = HashMap::new();

    for row in rows {
        let label = group_key(row.get(config.group_by));
        if !groups.contains_key(&label) {
            group_order.push(label.clone());
        }
        let entry = groups.entry(label).or_default();
        entry.0 += 1;
        entry.1.extend(row.number(config.value));
    }

    if group_order.is_empty() {
        return None;
    }

    let mut points: Vec<ChartPoint> = group_order
        .into_iter()
        .filter_map(|label| {
            let (count, values) = groups.remove(&label)?;
            let value = aggregate(config.aggregation, count, &values);
            // groups whose values are all absent have nothing to plot
            value.is_finite().then_some(ChartPoint { label, value })
        })
        .collect();

    match config.sort_order {
        SortOrder::None => {}
        SortOrder::LabelAsc => points.sort_by(|a, b| a.label.cmp(&b.label)),
        SortOrder::LabelDesc => points.sort_by(|a, b| b.label.cmp(&a.label)),
        SortOrder::ValueAsc => points.sort_by(|a, b| a.value.total_cmp(&b.value)),
        SortOrder::ValueDesc => points.sort_by(|a, b| b.value.total_cmp(&a.value)),
    }
    points.truncate(config.max_points);

    if points.is_empty() {
        return None;
    }

    let max_value = points.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
    let min_value = points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);

    Some(ChartData {
        points,
        x_label: config.group_by.name().to_string(),
        y_label: config.value.name().to_string(),
        max_value,
        min_value,
    })
}

/// Countries with known coordinates, in row order.
///
/// Rows without a coordinate pair are left out rather than placed at (0, 0).
pub fn map_points(rows: &[CountryRow]) -> Vec<MapPoint> {
    rows.iter()
        .filter_map(|row| {
            let (latitude, longitude) = row.coordinates()?;
            Some(MapPoint {
                name: row.name.clone(),
                latitude,
                longitude,
                population: row.population,
            })
        })
        .collect()
}
