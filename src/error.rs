//! Error types.
//!
//! The context, iterator and comparison APIs are infallible: they answer
//! with `bool`, `Option` or [`ComparisonOutcome`](crate::security::ComparisonOutcome).
//! Errors only arise when configuration is loaded from outside the process.

use std::path::PathBuf;

/// Error loading or applying comparator configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration text is not valid TOML for this schema.
    #[error("invalid comparator config: {0}")]
    Parse(String),
    /// A configuration entry names a comparator that does not exist.
    #[error("unknown comparator `{0}`")]
    UnknownComparator(String),
    /// A configuration entry has an empty protocol identifier.
    #[error("comparator entry has an empty protocol identifier")]
    EmptyProtocol,
}

impl ConfigError {
    /// Returns `true` if the error came from reading the file rather than
    /// from its contents.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
