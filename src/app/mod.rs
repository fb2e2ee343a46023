//! Session state shared with the presentation layer.
//!
//! A [`Session`] owns the table built from one fetch. Navigation between
//! dashboard pages is described by [`Page`], which the presentation layer
//! owns and passes around; nothing in the data pipeline reads it.

use crate::data::{FetchError, Fetcher, Table, normalize_with_report};
use std::time::SystemTime;
use tracing::{info, warn};

/// Dashboard pages
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum Page {
    #[default]
    Overview,
    Statistics,
    Sorting,
    Filtering,
    Charts,
    Map,
    Export,
}

impl Page {
    pub fn label(&self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::Statistics => "Statistics",
            Page::Sorting => "Sorting",
            Page::Filtering => "Filtering",
            Page::Charts => "Charts",
            Page::Map => "Map",
            Page::Export => "Export",
        }
    }

    pub fn all() -> &'static [Page] {
        &[
            Page::Overview,
            Page::Statistics,
            Page::Sorting,
            Page::Filtering,
            Page::Charts,
            Page::Map,
            Page::Export,
        ]
    }
}

/// The table for one dashboard session
#[derive(Clone, Debug)]
pub struct Session {
    table: Table,
    loaded_at: SystemTime,
}

impl Session {
    /// Fetch and normalize the dataset.
    ///
    /// Fetch errors are returned as-is; no table is built from a failed fetch.
    pub fn load(fetcher: &Fetcher) -> Result<Self, FetchError> {
        let records = fetcher.fetch()?;
        let report = normalize_with_report(&records);

        if !report.skipped.is_empty() {
            warn!(
                skipped = report.skipped.len(),
                indices = ?report.skipped,
                "session: dropped records that are not JSON objects"
            );
        }
        info!(rows = report.rows.len(), endpoint = fetcher.endpoint(), "session: table built");

        Ok(Self::from_table(Table::new(report.rows)))
    }

    pub fn from_table(table: Table) -> Self {
        Self {
            table,
            loaded_at: SystemTime::now(),
        }
    }

    /// Rebuild the table from a fresh fetch.
    ///
    /// On failure the current table stays in place.
    pub fn refresh(&mut self, fetcher: &Fetcher) -> Result<(), FetchError> {
        *self = Self::load(fetcher)?;
        Ok(())
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn loaded_at(&self) -> SystemTime {
        self.loaded_at
    }
}
