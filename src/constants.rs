//! Application-wide constants.
//!
//! Centralizes endpoints, network defaults and column names so the
//! fetcher, normalizer and exporters agree on them.

use std::time::Duration;

// ============================================================================
// Data Sources
// ============================================================================

/// Mirrored static copy of the country dataset (default source)
pub const MIRROR_ENDPOINT: &str =
    "https://raw.githubusercontent.com/jxnscv/Programacion/main/all.json";

/// Live REST API serving the same schema
pub const LIVE_ENDPOINT: &str = "https://restcountries.com/v3.1/all";

// ============================================================================
// Network Defaults
// ============================================================================

/// Timeout for a single HTTP request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Total number of attempts (first try included) for transient failures
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Fixed delay between attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Upper bound for exponential backoff delays
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

// ============================================================================
// Normalization
// ============================================================================

/// Placeholder for text fields the source does not provide
pub const NOT_AVAILABLE: &str = "not available";

// ============================================================================
// Export
// ============================================================================

/// Canonical column names, in export order
pub const COLUMN_NAMES: [&str; 9] = [
    "name",
    "region",
    "population",
    "area",
    "borderCount",
    "officialLanguageCount",
    "timezoneCount",
    "latitude",
    "longitude",
];

/// Number of columns when coordinates are left out of an export
pub const CORE_COLUMN_COUNT: usize = 7;

/// Worksheet name used by Excel exports
pub const XLSX_SHEET_NAME: &str = "countries";

/// Default number of points shown in a chart
pub const MAX_CHART_POINTS: usize = 12;
