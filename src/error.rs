// src/error.rs

//! Unified error handling for the board watcher.

use std::fmt;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A listing entry could not be turned into a post (deleted, malformed,
    /// or its body could not be fetched). Skipped by the walker.
    #[error("Post unavailable ({url}): {reason}")]
    PostUnavailable { url: String, reason: String },

    /// The listing page no longer has the expected layout. Fatal to a scan.
    #[error("Listing structure changed at {url}: {message}")]
    ListingStructureChanged { url: String, message: String },

    /// Delivery collaborator failed
    #[error("Notify error: {0}")]
    Notify(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a post-unavailable error.
    pub fn post_unavailable(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::PostUnavailable {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a listing-structure error.
    pub fn listing_changed(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::ListingStructureChanged {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a delivery error.
    pub fn notify(message: impl Into<String>) -> Self {
        Self::Notify(message.into())
    }

    /// Whether the walker may skip this error and keep going.
    pub fn is_post_unavailable(&self) -> bool {
        matches!(self, Self::PostUnavailable { .. })
    }
}
