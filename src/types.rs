//! Core types for the country table.
//!
//! This module defines the normalized row, the column identifiers used by
//! table operations, and the chart configuration types.

use crate::constants::{COLUMN_NAMES, MAX_CHART_POINTS, NOT_AVAILABLE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A country record as returned by the remote source.
///
/// Any JSON value is accepted; the normalizer decides what is usable.
pub type RawCountryRecord = serde_json::Value;

// ============================================================================
// Country Rows
// ============================================================================

/// One normalized country.
///
/// All scalar fields are always populated. Coordinates are either both
/// present or both absent; an absent coordinate is never stored as zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRow {
    pub name: String,
    pub region: String,
    pub population: u64,
    /// Surface area in km²
    pub area: f64,
    pub border_count: u64,
    pub official_language_count: u64,
    pub timezone_count: u64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for CountryRow {
    fn default() -> Self {
        Self {
            name: NOT_AVAILABLE.to_string(),
            region: NOT_AVAILABLE.to_string(),
            population: 0,
            area: 0.0,
            border_count: 0,
            official_language_count: 0,
            timezone_count: 0,
            latitude: None,
            longitude: None,
        }
    }
}

impl CountryRow {
    /// Read a column of this row
    pub fn get(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Name => FieldValue::Text(&self.name),
            Field::Region => FieldValue::Text(&self.region),
            Field::Numeric(numeric) => match self.number(numeric) {
                Some(n) => FieldValue::Number(n),
                None => FieldValue::Missing,
            },
        }
    }

    /// Read a numeric column; `None` only for absent coordinates
    pub fn number(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::Population => Some(self.population as f64),
            NumericField::Area => Some(self.area),
            NumericField::BorderCount => Some(self.border_count as f64),
            NumericField::OfficialLanguageCount => Some(self.official_language_count as f64),
            NumericField::TimezoneCount => Some(self.timezone_count as f64),
            NumericField::Latitude => self.latitude,
            NumericField::Longitude => self.longitude,
        }
    }

    /// Coordinates as a pair, if the source provided them
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// A borrowed cell value
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Missing,
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Missing => Ok(()),
        }
    }
}

// ============================================================================
// Column Identifiers
// ============================================================================

/// Columns holding numbers
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NumericField {
    Population,
    Area,
    BorderCount,
    OfficialLanguageCount,
    TimezoneCount,
    Latitude,
    Longitude,
}

impl NumericField {
    pub fn all() -> &'static [NumericField] {
        &[
            NumericField::Population,
            NumericField::Area,
            NumericField::BorderCount,
            NumericField::OfficialLanguageCount,
            NumericField::TimezoneCount,
            NumericField::Latitude,
            NumericField::Longitude,
        ]
    }

    /// Canonical column name
    pub fn name(&self) -> &'static str {
        Field::Numeric(*self).name()
    }
}

/// Any column of a [`CountryRow`]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    Name,
    Region,
    Numeric(NumericField),
}

impl Field {
    pub const POPULATION: Field = Field::Numeric(NumericField::Population);
    pub const AREA: Field = Field::Numeric(NumericField::Area);

    /// All columns in export order
    pub fn all() -> [Field; 9] {
        [
            Field::Name,
            Field::Region,
            Field::Numeric(NumericField::Population),
            Field::Numeric(NumericField::Area),
            Field::Numeric(NumericField::BorderCount),
            Field::Numeric(NumericField::OfficialLanguageCount),
            Field::Numeric(NumericField::TimezoneCount),
            Field::Numeric(NumericField::Latitude),
            Field::Numeric(NumericField::Longitude),
        ]
    }

    /// Position of this column in [`COLUMN_NAMES`]
    pub fn index(&self) -> usize {
        match self {
            Field::Name => 0,
            Field::Region => 1,
            Field::Numeric(NumericField::Population) => 2,
            Field::Numeric(NumericField::Area) => 3,
            Field::Numeric(NumericField::BorderCount) => 4,
            Field::Numeric(NumericField::OfficialLanguageCount) => 5,
            Field::Numeric(NumericField::TimezoneCount) => 6,
            Field::Numeric(NumericField::Latitude) => 7,
            Field::Numeric(NumericField::Longitude) => 8,
        }
    }

    pub fn name(&self) -> &'static str {
        COLUMN_NAMES[self.index()]
    }

    pub fn as_numeric(&self) -> Option<NumericField> {
        match self {
            Field::Numeric(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<NumericField> for Field {
    fn from(field: NumericField) -> Self {
        Field::Numeric(field)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Column names given by the user could not be matched
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldParseError {
    #[error("unknown column: {0}")]
    Unknown(String),
    #[error("column {0} is not numeric")]
    NotNumeric(Field),
}

impl FromStr for Field {
    type Err = FieldParseError;

    /// Accepts canonical names case-insensitively, plus snake_case spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.trim().chars().filter(|c| *c != '_').collect();
        Field::all()
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| FieldParseError::Unknown(s.to_string()))
    }
}

impl FromStr for NumericField {
    type Err = FieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field: Field = s.parse()?;
        field.as_numeric().ok_or(FieldParseError::NotNumeric(field))
    }
}

// ============================================================================
// Chart Types
// ============================================================================

/// Chart configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Column providing the labels (one point per distinct value)
    pub group_by: Field,
    /// Column providing the values
    pub value: NumericField,
    /// How to combine values sharing a label
    pub aggregation: AggregationType,
    /// Sort order for the chart data
    pub sort_order: SortOrder,
    /// Maximum number of points kept after sorting
    pub max_points: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            group_by: Field::Region,
            value: NumericField::Population,
            aggregation: AggregationType::default(),
            sort_order: SortOrder::default(),
            max_points: MAX_CHART_POINTS,
        }
    }
}

impl ChartConfig {
    pub fn new(group_by: Field, value: NumericField) -> Self {
        Self {
            group_by,
            value,
            ..Default::default()
        }
    }

    pub fn with_aggregation(mut self, aggregation: AggregationType) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points;
        self
    }
}

/// Aggregation method for grouped values
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregationType {
    /// Sum values for each group
    #[default]
    Sum,
    /// Average values for each group
    Average,
    /// Count rows in each group
    Count,
    /// Minimum value in each group
    Min,
    /// Maximum value in each group
    Max,
}

impl AggregationType {
    pub fn label(&self) -> &'static str {
        match self {
            AggregationType::Sum => "Sum",
            AggregationType::Average => "Average",
            AggregationType::Count => "Count",
            AggregationType::Min => "Min",
            AggregationType::Max => "Max",
        }
    }

    pub fn all() -> &'static [AggregationType] {
        &[
            AggregationType::Sum,
            AggregationType::Average,
            AggregationType::Count,
            AggregationType::Min,
            AggregationType::Max,
        ]
    }
}

impl FromStr for AggregationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AggregationType::all()
            .iter()
            .copied()
            .find(|a| a.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown aggregation: {}", s))
    }
}

/// Sort order for chart data
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Keep first-appearance order
    None,
    /// Sort by label ascending (A-Z)
    LabelAsc,
    /// Sort by label descending (Z-A)
    LabelDesc,
    /// Sort by value ascending (low to high)
    ValueAsc,
    /// Sort by value descending (high to low)
    #[default]
    ValueDesc,
}

impl SortOrder {
    /// Command-line spelling
    pub fn key(&self) -> &'static str {
        match self {
            SortOrder::None => "original",
            SortOrder::LabelAsc => "label-asc",
            SortOrder::LabelDesc => "label-desc",
            SortOrder::ValueAsc => "value-asc",
            SortOrder::ValueDesc => "value-desc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::None => "first appearance",
            SortOrder::LabelAsc => "label ascending",
            SortOrder::LabelDesc => "label descending",
            SortOrder::ValueAsc => "value ascending",
            SortOrder::ValueDesc => "value descending",
        }
    }

    pub fn all() -> &'static [SortOrder] {
        &[
            SortOrder::None,
            SortOrder::LabelAsc,
            SortOrder::LabelDesc,
            SortOrder::ValueAsc,
            SortOrder::ValueDesc,
        ]
    }
}

impl FromStr for SortOrder {
    type Err = String;

    /// Accepts the [`SortOrder::key`] spellings; `_` may stand in for `-`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('_', "-");
        SortOrder::all()
            .iter()
            .copied()
            .find(|order| order.key().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| {
                let keys: Vec<_> = SortOrder::all().iter().map(SortOrder::key).collect();
                format!("unknown sort order: {} (expected one of {})", s, keys.join(", "))
            })
    }
}
