//! Unit tests for table queries and column statistics.

use crate::helpers::{RowBuilder, row, sample_table};
use countryboard::constants::NOT_AVAILABLE;
use countryboard::data::{RangeFilter, RowSet, Table, View};
use countryboard::types::{AggregationType, CountryRow, Field, NumericField};

fn names(view: &View) -> Vec<&str> {
    view.iter().map(|r| r.name.as_str()).collect()
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_filter_at_least_threshold_is_inclusive() {
    let view = sample_table().filter_at_least(NumericField::Population, 200.0);
    assert_eq!(names(&view), vec!["Aland", "Cland"]);
}

#[test]
fn test_filter_empty_range_yields_empty_view() {
    let view = sample_table().filter(NumericField::Population, 500.0, 100.0);
    assert!(view.is_empty());
}

#[test]
fn test_filter_on_empty_table() {
    let table = Table::default();
    assert!(table.filter(NumericField::Area, 0.0, f64::MAX).is_empty());
    assert!(table.filter_at_least(NumericField::Area, 0.0).is_empty());
}

#[test]
fn test_filters_chain_on_views() {
    let view = sample_table()
        .filter_at_least(NumericField::Population, 100.0)
        .filter(NumericField::Area, 15.0, 35.0);
    assert_eq!(names(&view), vec!["Cland", "Dland"]);
}

#[test]
fn test_range_filter_ignores_absent_coordinates() {
    let filter = RangeFilter::new(NumericField::Longitude, f64::MIN, f64::MAX);
    assert!(!filter.matches(&row("Nowhere", "X", 1)));
    assert!(filter.matches(&RowBuilder::new("Somewhere").coordinates(0.0, 0.0).build()));
}

// ============================================================================
// Sorting
// ============================================================================

#[test]
fn test_sort_by_name() {
    let table = Table::new(vec![row("b", "X", 1), row("C", "X", 1), row("a", "X", 1)]);
    let view = table.sort(Field::Name, true);
    // byte order: uppercase before lowercase
    assert_eq!(names(&view), vec!["C", "a", "b"]);
}

#[test]
fn test_sort_ascending_keeps_ties_in_input_order() {
    let view = sample_table().sort(Field::POPULATION, true);
    assert_eq!(names(&view), vec!["Eland", "Bland", "Dland", "Cland", "Aland"]);
}

#[test]
fn test_sort_by_area_descending() {
    let view = sample_table().sort(Field::AREA, false);
    assert_eq!(names(&view), vec!["Bland", "Dland", "Cland", "Aland", "Eland"]);
}

#[test]
fn test_head_truncates() {
    let view = sample_table().sort(Field::POPULATION, false).head(2);
    assert_eq!(names(&view), vec!["Aland", "Cland"]);
    assert_eq!(sample_table().view().head(100).len(), 5);
}

// ============================================================================
// Statistics
// ============================================================================

#[test]
fn test_stats_population() {
    let table = Table::new(vec![row("a", "X", 2), row("b", "X", 4), row("c", "X", 6)]);
    let stats = table.stats(NumericField::Population);
    assert_eq!(stats.count, 3);
    assert_eq!(stats.mean, 4.0);
    assert_eq!(stats.median, 4.0);
    assert_eq!(stats.stddev, 2.0);
}

#[test]
fn test_stats_area_median() {
    let stats = sample_table().stats(NumericField::Area);
    assert_eq!(stats.median, 20.0);
    assert_eq!(stats.mean, 21.0);
}

#[test]
fn test_stats_single_value_has_no_stddev() {
    let stats = Table::new(vec![row("a", "X", 9)]).stats(NumericField::Population);
    assert_eq!(stats.mean, 9.0);
    assert_eq!(stats.median, 9.0);
    assert!(!stats.has_stddev());
}

#[test]
fn test_stats_empty_is_nan() {
    let stats = Table::default().stats(NumericField::Population);
    assert_eq!(stats.count, 0);
    assert!(stats.mean.is_nan());
    assert!(stats.median.is_nan());
    assert!(stats.stddev.is_nan());
}

#[test]
fn test_stats_skip_absent_coordinates() {
    let table = Table::new(vec![
        RowBuilder::new("a").coordinates(10.0, 0.0).build(),
        RowBuilder::new("b").build(),
        RowBuilder::new("c").coordinates(30.0, 0.0).build(),
    ]);
    let stats = table.stats(NumericField::Latitude);
    assert_eq!(stats.count, 2);
    assert_eq!(stats.mean, 20.0);
}

// ============================================================================
// Grouping
// ============================================================================

#[test]
fn test_sum_by_group_regions() {
    let totals = sample_table().sum_by_group(Field::Region, NumericField::Population);
    let keys: Vec<_> = totals.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Africa", "Asia", "Europe"]);
    assert_eq!(totals["Africa"], 50.0);
    assert_eq!(totals["Asia"], 200.0);
    assert_eq!(totals["Europe"], 500.0);
}

#[test]
fn test_sum_by_group_on_empty_view() {
    let totals = View::default().sum_by_group(Field::Region, NumericField::Population);
    assert!(totals.is_empty());
}

#[test]
fn test_sum_by_group_collects_unknown_region() {
    let table = Table::new(vec![CountryRow::default(), row("a", "Asia", 5)]);
    let totals = table.sum_by_group(Field::Region, NumericField::Population);
    assert_eq!(totals[NOT_AVAILABLE], 0.0);
    assert_eq!(totals["Asia"], 5.0);
}

#[test]
fn test_group_by_numeric_column() {
    let totals = sample_table().aggregate_by_group(
        Field::POPULATION,
        NumericField::Area,
        AggregationType::Count,
    );
    assert_eq!(totals["100"], 2.0);
    assert_eq!(totals["300"], 1.0);
}
