//! Error types and handling for `Skycast`

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::Provider;

/// Shown instead of upstream details, which only go to the logs
pub const UPSTREAM_USER_MESSAGE: &str =
    "Weather services are temporarily unavailable. Please try again in a moment.";

/// Main error type for the `Skycast` pipeline
#[derive(Error, Debug)]
pub enum SkycastError {
    /// A required credential or setting is missing
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Malformed user input, detected before any network call
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// No configured geocoding provider returned a candidate
    #[error("Location not found: '{query}'. Please try a different search term.")]
    NotFound { query: String },

    /// A required upstream call failed or returned an unusable body
    #[error("{provider} request failed: {message}")]
    Upstream {
        provider: Provider,
        status: Option<u16>,
        message: String,
    },
}

/// Failure classification exposed to callers of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Configuration,
    Validation,
    NotFound,
    UpstreamError,
}

impl SkycastError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error for the given query text
    pub fn not_found<S: Into<String>>(query: S) -> Self {
        Self::NotFound {
            query: query.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(provider: Provider, status: Option<u16>, message: S) -> Self {
        Self::Upstream {
            provider,
            status,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            SkycastError::Config { .. } => FailureKind::Configuration,
            SkycastError::Validation { .. } => FailureKind::Validation,
            SkycastError::NotFound { .. } => FailureKind::NotFound,
            SkycastError::Upstream { .. } => FailureKind::UpstreamError,
        }
    }

    /// Get a user-friendly error message
    ///
    /// Upstream details stay in the logs; everything else is shown verbatim.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SkycastError::Upstream { .. } => UPSTREAM_USER_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}
