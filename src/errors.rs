//! Shared error types for canteiro.
//!
//! The filtering, grouping and pagination engines are total functions and
//! never produce errors: malformed dates or amounts degrade to neutral values.
//! Errors only arise at the boundaries, when reading configuration,
//! snapshots, month ranges, remote RD documents or persisted alerts.
//!
//! # Example
//!
//! ```rust
//! use canteiro::errors::{Error, ResultExt};
//!
//! let parsed: canteiro::errors::Result<u32> = Err(Error::InvalidMonth("2024-13".into()));
//! let err = parsed.context("Reading --from").unwrap_err();
//! assert_eq!(err.to_string(), "Reading --from: Invalid month '2024-13': expected YYYY-MM");
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for canteiro operations
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A `YYYY-MM` value that could not be parsed
    #[error("Invalid month '{0}': expected YYYY-MM")]
    InvalidMonth(String),

    /// A month range whose start lies after its end
    #[error("Invalid month range: {start} is after {end}")]
    InvalidRange { start: String, end: String },

    /// A single RD or assignment read that failed
    #[error("Fetch failed for user '{user_id}' ({period}): {message}")]
    Fetch {
        user_id: String,
        period: String,
        message: String,
    },

    /// Snapshot files that are readable but structurally wrong
    #[error("Snapshot error in {}: {message}", path.display())]
    Snapshot { path: PathBuf, message: String },

    /// Alert persistence errors
    #[error("Alert store error: {0}")]
    AlertStore(String),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a fetch error for one (user, month) read
    pub fn fetch(
        user_id: impl Into<String>,
        period: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        Self::Fetch {
            user_id: user_id.into(),
            period: period.to_string(),
            message: message.into(),
        }
    }

    /// Create a snapshot error with path context
    pub fn snapshot(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Snapshot {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
