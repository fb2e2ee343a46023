//! Country data exploration core.
//!
//! Fetches the country dataset, normalizes it into a fixed-shape table and
//! provides the filter, sort, statistics, chart and export operations a
//! dashboard front end needs.
//!
//! ```rust,ignore
//! use countryboard::data::{Fetcher, RowSet};
//! use countryboard::app::Session;
//! use countryboard::types::NumericField;
//!
//! let fetcher = Fetcher::new(countryboard::constants::MIRROR_ENDPOINT)?;
//! let session = Session::load(&fetcher)?;
//! let populous = session.table().filter_at_least(NumericField::Population, 1_000_000.0);
//! println!("{}", populous.stats(NumericField::Area).mean);
//! ```

pub mod app;
pub mod background;
pub mod constants;
pub mod data;
pub mod settings;
pub mod types;
