//! Test helpers and builders for reducing boilerplate in tests.
//!
//! This module provides:
//! - `RowBuilder` - Builder pattern for normalized rows
//! - `scripted_fetcher()` - A fetcher that replays canned responses without sleeping
//! - `sample_payload()` - A small dataset in the shape the remote source returns

#![allow(dead_code)]

use countryboard::data::{FetchError, Fetcher, HttpResponse, RetryPolicy, Table};
use countryboard::types::CountryRow;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// RowBuilder
// ============================================================================

/// Builder for test rows; unspecified fields keep their defaults.
///
/// # Example
/// ```ignore
/// let row = RowBuilder::new("Testland")
///     .region("Europe")
///     .population(1000)
///     .coordinates(10.0, 20.0)
///     .build();
/// ```
pub struct RowBuilder {
    row: CountryRow,
}

impl RowBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            row: CountryRow {
                name: name.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn region(mut self, region: &str) -> Self {
        self.row.region = region.to_string();
        self
    }

    pub fn population(mut self, population: u64) -> Self {
        self.row.population = population;
        self
    }

    pub fn area(mut self, area: f64) -> Self {
        self.row.area = area;
        self
    }

    pub fn counts(mut self, borders: u64, languages: u64, timezones: u64) -> Self {
        self.row.border_count = borders;
        self.row.official_language_count = languages;
        self.row.timezone_count = timezones;
        self
    }

    pub fn coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.row.latitude = Some(latitude);
        self.row.longitude = Some(longitude);
        self
    }

    pub fn build(self) -> CountryRow {
        self.row
    }
}

/// Shorthand for a row with name, region and population
pub fn row(name: &str, region: &str, population: u64) -> CountryRow {
    RowBuilder::new(name).region(region).population(population).build()
}

/// Table with a handful of rows across three regions
pub fn sample_table() -> Table {
    Table::new(vec![
        RowBuilder::new("Aland").region("Europe").population(300).area(10.0).build(),
        RowBuilder::new("Bland").region("Asia").population(100).area(40.0).build(),
        RowBuilder::new("Cland").region("Europe").population(200).area(20.0).build(),
        RowBuilder::new("Dland").region("Asia").population(100).area(30.0).build(),
        RowBuilder::new("Eland").region("Africa").population(50).area(5.0).build(),
    ])
}

// ============================================================================
// Fetch fixtures
// ============================================================================

pub type Script = Vec<Result<HttpResponse, FetchError>>;

/// A fetcher that answers each attempt with the next scripted response.
///
/// Sleeps are recorded instead of performed; the returned handle holds the
/// requested delays in order.
pub fn scripted_fetcher(script: Script, policy: RetryPolicy) -> (Fetcher, Arc<Mutex<Vec<Duration>>>) {
    let queue = Mutex::new(script.into_iter());
    let transport = move |_: &str, _: Duration| -> Result<HttpResponse, FetchError> {
        queue
            .lock()
            .next()
            .unwrap_or(Err(FetchError::ConnectionFailed("script exhausted".into())))
    };

    let sleeps = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&sleeps);
    let fetcher = Fetcher::with_transport("http://countries.test/all.json", transport)
        .with_retry_policy(policy)
        .with_sleep(move |d: Duration| sink.lock().push(d));

    (fetcher, sleeps)
}

/// A fetcher that always answers with the given JSON body
pub fn fetcher_for(body: &str) -> Fetcher {
    let body = body.to_string();
    Fetcher::with_transport(
        "http://countries.test/all.json",
        move |_: &str, _: Duration| -> Result<HttpResponse, FetchError> {
            Ok(HttpResponse::ok(body.clone()))
        },
    )
    .with_retry_policy(RetryPolicy::none())
}

/// Three records: a complete one, an empty object and a large Asian country
pub fn sample_payload() -> &'static str {
    r#"[
        {
            "name": {"common": "Testland", "official": "Republic of Testland"},
            "region": "Europe",
            "population": 1000,
            "area": 500,
            "borders": ["AAA", "BBB"],
            "languages": {"tst": "Testish"},
            "timezones": ["UTC+01:00"],
            "latlng": [10, 20]
        },
        {},
        {
            "name": {"common": "Bigland"},
            "region": "Asia",
            "population": 5000000,
            "area": 120000.5,
            "borders": [],
            "languages": {"big": "Biggish", "eng": "English"},
            "timezones": ["UTC+07:00", "UTC+08:00"],
            "latlng": [35.5, 105.25]
        }
    ]"#
}
