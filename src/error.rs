// src/error.rs

//! Error types for opmirror

use thiserror::Error;

/// Errors produced while reading catalogs and resolving upgrade paths
#[derive(Error, Debug)]
pub enum Error {
    /// A version string has no usable numeric core after normalization
    #[error("Unparsable version '{0}'")]
    UnparsableVersion(String),

    /// A skip-range expression is not two `<op><version>` tokens
    #[error("Malformed skip range '{range}': {reason}")]
    MalformedSkipRange { range: String, reason: String },

    /// The package has no default channel or the channel has no head bundle
    #[error("No default channel head for package '{0}'")]
    NoDefaultChannelHead(String),

    /// Every branch of the search dead-ended, cycled, or ran past the depth bound
    #[error("There is no upgrade path for {operator} version {version}: {reason}")]
    NoUpgradePath {
        operator: String,
        version: String,
        reason: String,
    },

    /// A lookup in the catalog found nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid batch configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// SQLite error while querying the catalog index
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Fill in the operator name of a [`Error::NoUpgradePath`] raised below
    /// the level that knows it
    pub fn with_operator(self, name: &str) -> Self {
        match self {
            Error::NoUpgradePath {
                operator,
                version,
                reason,
            } if operator.is_empty() => Error::NoUpgradePath {
                operator: name.to_string(),
                version,
                reason,
            },
            other => other,
        }
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;
