//! Data retrieval and handling module
//!
//! This module turns the remote country dataset into an immutable table and
//! provides the queries and exports the presentation layer consumes.
//!
//! ## Pipeline
//!
//! `Fetcher` → `normalize` → `Table` → views, statistics, charts, exports.
//!
//! ## Error Handling
//!
//! - `FetchError`: transport faults (retried), bad status or payload (not retried)
//! - `ExportError`: IO and format errors while writing or reading exports
//!
//! Normalization and table queries never fail.

mod chart_engine;
mod error;
mod export;
mod fetcher;
mod normalizer;
mod retry;
mod stats;
mod table;

pub use chart_engine::*;
pub use error::*;
pub use export::*;
pub use fetcher::*;
pub use normalizer::*;
pub use retry::*;
pub use stats::*;
pub use table::*;
