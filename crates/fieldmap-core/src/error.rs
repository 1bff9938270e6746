//! Error handling for FieldMap
//!
//! Provides error types for the layers that can actually fail:
//! - Query errors (object query against the backend)
//! - Export errors (writing the drawn feature collection)
//! - Feature errors (store identity, malformed imports)
//!
//! Drawing preconditions (finalizing below the minimum vertex count) are
//! not errors and never surface here. All error types use `thiserror`.

use thiserror::Error;

/// Object query error type
///
/// Represents failures of one fetch cycle against the backend object
/// query service.
#[derive(Error, Debug, Clone)]
pub enum QueryError {
    /// Request could not be sent or the connection dropped
    #[error("Transport error: {reason}")]
    Transport {
        /// The reason reported by the HTTP client.
        reason: String,
    },

    /// Backend answered with a non-success status
    #[error("Backend returned HTTP {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// Request timed out in the HTTP client
    #[error("Query timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// Response body was not a feature collection
    #[error("Failed to decode response: {reason}")]
    Decode {
        /// The reason decoding failed.
        reason: String,
    },
}

/// Export error type
#[derive(Error, Debug)]
pub enum ExportError {
    /// Could not write the export file
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    /// Could not serialize the collection
    #[error("Failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Feature error type
///
/// Represents violations of the feature store's identity rules and
/// malformed collections handed to the importer.
#[derive(Error, Debug, Clone)]
pub enum FeatureError {
    /// A feature with the same id is already stored
    #[error("Duplicate feature id: {id}")]
    DuplicateId {
        /// The conflicting id.
        id: String,
    },

    /// Imported collection is not usable
    #[error("Malformed feature collection: {reason}")]
    MalformedCollection {
        /// What was wrong with the input.
        reason: String,
    },
}

/// Main error type for FieldMap
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Object query error
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Feature error
    #[error(transparent)]
    Feature(#[from] FeatureError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Query(QueryError::Timeout { .. }))
    }

    /// Check if this is a query error
    pub fn is_query_error(&self) -> bool {
        matches!(self, Error::Query(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
