use crate::core::timestamp::TimestampField;
use sea_orm::DbErr;
use thiserror::Error;

/// Every failure the ledger can report.
#[derive(Debug, Error)]
pub enum Error {
    /// A timestamp field or separator did not scan.
    #[error("Malformed timestamp: bad {field} at '{raw}'")]
    MalformedTimestamp {
        /// Component being read when scanning stopped
        field: TimestampField,
        /// Remainder of the input from the offending position
        raw: String,
    },

    /// Timestamp components scanned but do not name a real date and time.
    #[error("Timestamp '{text}' is not a valid calendar date")]
    InvalidCalendarDate {
        /// The full timestamp text
        text: String,
    },

    /// A write transaction could not be opened, executed or committed.
    #[error("Write transaction failed: {0}")]
    WriteFailure(#[source] DbErr),

    /// A read or schema operation failed.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// The collection could not be serialized for export.
    #[error("Failed to encode items: {message}")]
    EncodeFailure {
        /// Serializer message
        message: String,
    },

    /// One element of an import batch could not be decoded.
    #[error("Failed to decode element {index}: {source}")]
    DecodeFailure {
        /// Position of the element in the imported array
        index: usize,
        /// Underlying decode error
        source: Box<Error>,
    },

    /// The add flow rejected its input.
    #[error("Invalid entry: {message}")]
    InvalidEntry {
        /// What was wrong with the input
        message: String,
    },

    /// Settings could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Detail
        message: String,
    },

    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The payload is not JSON of the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Environment variable error.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
