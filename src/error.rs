//! Error types for the Glaive library.
//!
//! All fallible operations return [`GlaiveError`] through the crate-wide
//! [`Result`] alias. Tokenization and query evaluation never fail: an empty
//! query or an unknown term simply produces no results. Errors are reserved
//! for bad build configuration, structurally broken index files, and I/O.
//!
//! # Examples
//!
//! ```
//! use glaive::error::{GlaiveError, Result};
//!
//! fn check_fields(fields: &[&str]) -> Result<()> {
//!     if fields.is_empty() {
//!         return Err(GlaiveError::config("at least one field must be indexed"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_fields(&[]).is_err());
//! assert!(check_fields(&["title"]).is_ok());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Glaive operations.
#[derive(Error, Debug)]
pub enum GlaiveError {
    /// I/O errors (reading documents, writing index files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed build configuration, detected before any indexing work
    #[error("Configuration error: {0}")]
    Config(String),

    /// A persisted index whose structural invariants do not hold
    #[error("Malformed index at `{key}`: {reason}")]
    MalformedIndex {
        /// Path of the offending key inside the index document
        key: String,
        /// What is wrong with it
        reason: String,
    },

    /// Invalid caller input (CLI arguments, document records)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with GlaiveError.
pub type Result<T> = std::result::Result<T, GlaiveError>;

impl GlaiveError {
    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        GlaiveError::Config(msg.into())
    }

    /// Create a new malformed-index error for the given key.
    pub fn malformed<K: Into<String>, S: Into<String>>(key: K, reason: S) -> Self {
        GlaiveError::MalformedIndex {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        GlaiveError::InvalidArgument(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        GlaiveError::Other(msg.into())
    }

    /// The offending key, if this is a malformed-index error.
    pub fn malformed_key(&self) -> Option<&str> {
        match self {
            GlaiveError::MalformedIndex { key, .. } => Some(key),
            _ => None,
        }
    }
}
