//! The country table and derived views.
//!
//! A [`Table`] is built once per session and never changes. Every query
//! returns a new [`View`] (an owned copy of the selected rows) or a computed
//! value, so callers can chain filters and sorts freely without touching the
//! source rows.

use crate::constants::NOT_AVAILABLE;
use crate::data::error::ExportResult;
use crate::data::export;
use crate::data::normalizer::normalize_with_report;
use crate::data::stats::ColumnStats;
use crate::types::{AggregationType, CountryRow, Field, FieldValue, NumericField, RawCountryRecord};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Inclusive numeric range on one column
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeFilter {
    pub field: NumericField,
    pub min: f64,
    pub max: f64,
}

impl RangeFilter {
    pub fn new(field: NumericField, min: f64, max: f64) -> Self {
        Self { field, min, max }
    }

    /// Absent values never match
    pub fn matches(&self, row: &CountryRow) -> bool {
        row.number(self.field)
            .is_some_and(|v| self.min <= v && v <= self.max)
    }
}

/// Read-only queries shared by [`Table`] and [`View`]
pub trait RowSet {
    fn rows(&self) -> &[CountryRow];

    fn len(&self) -> usize {
        self.rows().len()
    }

    fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    /// Rows with `min <= row[field] <= max`
    fn filter(&self, field: NumericField, min: f64, max: f64) -> View {
        self.filter_all(&[RangeFilter::new(field, min, max)])
    }

    /// Rows satisfying every filter
    fn filter_all(&self, filters: &[RangeFilter]) -> View {
        self.rows()
            .iter()
            .filter(|row| filters.iter().all(|f| f.matches(row)))
            .cloned()
            .collect()
    }

    /// Rows with `row[field] >= threshold`
    fn filter_at_least(&self, field: NumericField, threshold: f64) -> View {
        self.rows()
            .iter()
            .filter(|row| row.number(field).is_some_and(|v| v >= threshold))
            .cloned()
            .collect()
    }

    /// Stable sort on one column.
    ///
    /// Rows with an absent value go last in either direction.
    fn sort(&self, field: Field, ascending: bool) -> View {
        let mut rows = self.rows().to_vec();
        rows.sort_by(|a, b| compare_values(a.get(field), b.get(field), ascending));
        View { rows }
    }

    /// Statistics over the present values of a column
    fn stats(&self, field: NumericField) -> ColumnStats {
        let values: Vec<f64> = self.rows().iter().filter_map(|r| r.number(field)).collect();
        ColumnStats::from_values(&values)
    }

    /// Total of `value` per distinct `group` value.
    ///
    /// Only groups with at least one row appear.
    fn sum_by_group(&self, group: Field, value: NumericField) -> BTreeMap<String, f64> {
        self.aggregate_by_group(group, value, AggregationType::Sum)
    }

    /// Aggregate `value` per distinct `group` value.
    ///
    /// Rows whose group value is absent are collected under the
    /// "not available" group. Absent values are ignored by the aggregation
    /// but still count toward [`AggregationType::Count`].
    fn aggregate_by_group(
        &self,
        group: Field,
        value: NumericField,
        aggregation: AggregationType,
    ) -> BTreeMap<String, f64> {
        let mut groups: BTreeMap<String, (usize, Vec<f64>)> = BTreeMap::new();
        for row in self.rows() {
            let entry = groups.entry(group_key(row.get(group))).or_default();
            entry.0 += 1;
            entry.1.extend(row.number(value));
        }

        groups
            .into_iter()
            .map(|(key, (rows, values))| (key, aggregate(aggregation, rows, &values)))
            .collect()
    }

    /// CSV bytes for these rows
    fn to_csv(&self) -> Vec<u8> {
        export::to_csv(self.rows())
    }

    /// Tab-separated spreadsheet bytes for these rows
    fn to_spreadsheet(&self) -> Vec<u8> {
        export::to_spreadsheet(self.rows())
    }

    /// Excel workbook bytes for these rows
    fn to_xlsx(&self) -> ExportResult<Vec<u8>> {
        export::to_xlsx(self.rows())
    }
}

/// Immutable table of normalized countries
#[derive(Clone, Debug, Default)]
pub struct Table {
    rows: Arc<[CountryRow]>,
}

impl Table {
    pub fn new(rows: Vec<CountryRow>) -> Self {
        Self { rows: rows.into() }
    }

    /// Normalize raw records into a table, dropping non-object records
    pub fn from_records(records: &[RawCountryRecord]) -> Self {
        Self::new(normalize_with_report(records).rows)
    }

    /// A view over every row
    pub fn view(&self) -> View {
        View {
            rows: self.rows.to_vec(),
        }
    }
}

impl RowSet for Table {
    fn rows(&self) -> &[CountryRow] {
        &self.rows
    }
}

/// A derived sequence of rows
#[derive(Clone, Debug, Default, PartialEq)]
pub struct View {
    rows: Vec<CountryRow>,
}

impl View {
    pub fn new(rows: Vec<CountryRow>) -> Self {
        Self { rows }
    }

    pub fn into_rows(self) -> Vec<CountryRow> {
        self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CountryRow> {
        self.rows.iter()
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> View {
        self.rows.iter().take(n).cloned().collect()
    }
}

impl RowSet for View {
    fn rows(&self) -> &[CountryRow] {
        &self.rows
    }
}

impl From<Vec<CountryRow>> for View {
    fn from(rows: Vec<CountryRow>) -> Self {
        Self { rows }
    }
}

impl FromIterator<CountryRow> for View {
    fn from_iter<I: IntoIterator<Item = CountryRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a View {
    type Item = &'a CountryRow;
    type IntoIter = std::slice::Iter<'a, CountryRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

fn compare_values(a: FieldValue<'_>, b: FieldValue<'_>, ascending: bool) -> Ordering {
    let ordering = match (a, b) {
        (FieldValue::Missing, FieldValue::Missing) => return Ordering::Equal,
        (FieldValue::Missing, _) => return Ordering::Greater,
        (_, FieldValue::Missing) => return Ordering::Less,
        (FieldValue::Text(x), FieldValue::Text(y)) => x.cmp(y),
        (FieldValue::Number(x), FieldValue::Number(y)) => x.total_cmp(&y),
        // a column never mixes text and numbers
        _ => Ordering::Equal,
    };
    if ascending { ordering } else { ordering.reverse() }
}

/// Group label for a cell; absent cells share the "not available" group
pub(crate) fn group_key(value: FieldValue<'_>) -> String {
    match value {
        FieldValue::Missing => NOT_AVAILABLE.to_string(),
        other => other.to_string(),
    }
}

/// Combine the present values of one group.
///
/// `rows` counts every row in the group, absent values included. Min, max
/// and average of an empty group are NaN.
pub(crate) fn aggregate(aggregation: AggregationType, rows: usize, values: &[f64]) -> f64 {
    match aggregation {
        AggregationType::Sum => values.iter().sum(),
        AggregationType::Average => crate::data::stats::mean(values),
        AggregationType::Count => rows as f64,
        AggregationType::Min => values.iter().copied().reduce(f64::min).unwrap_or(f64::NAN),
        AggregationType::Max => values.iter().copied().reduce(f64::max).unwrap_or(f64::NAN),
    }
}
