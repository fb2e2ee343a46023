//! Error types for data operations
//!
//! Provides unified error handling for fetching and export.

use thiserror::Error;

/// Errors that can occur while retrieving the raw dataset
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request did not complete within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Connection refused, DNS failure or another transport fault
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Server answered with something other than 200
    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),

    /// Body is not a JSON array of records
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl FetchError {
    /// Transient errors are worth another attempt
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Timeout | FetchError::ConnectionFailed(_))
    }
}

/// Errors that can occur while writing or reading exports
#[derive(Error, Debug)]
pub enum ExportError {
    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Workbook could not be assembled
    #[error("Excel export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Export content is not UTF-8
    #[error("export is not valid UTF-8")]
    Encoding,

    /// Input has no header line
    #[error("missing header row")]
    MissingHeader,

    /// Header does not list the canonical columns
    #[error("unexpected header: {0}")]
    HeaderMismatch(String),

    /// A record has the wrong number of fields
    #[error("line {line}: expected {expected} fields, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A field could not be read back into its column type
    #[error("line {line}: invalid value {value:?} for column {column}")]
    InvalidValue {
        line: usize,
        column: &'static str,
        value: String,
    },
}

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;
