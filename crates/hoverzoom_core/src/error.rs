//! Error types for URL validation and configuration loading.

use thiserror::Error;

/// Reasons a candidate image URL is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlError {
    /// Candidate was empty or whitespace only
    #[error("empty URL")]
    Empty,

    /// Candidate could not be parsed, even relative to the document
    #[error("unparsable URL '{url}': {source}")]
    Unparsable {
        /// The rejected candidate
        url: String,
        /// Underlying parser error
        #[source]
        source: ::url::ParseError,
    },

    /// Candidate parsed but is not http or https
    #[error("disallowed scheme '{scheme}'")]
    DisallowedScheme {
        /// Scheme of the rejected URL
        scheme: String,
    },
}

/// Errors that can occur while loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is outside its allowed range
    #[error("Invalid configuration: {message}")]
    Invalid {
        /// Description of the invalid value
        message: String,
    },
}

impl ConfigError {
    /// Create an invalid configuration error with a message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}
