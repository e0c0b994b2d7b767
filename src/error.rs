//! Error types for cruisesim
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for cruisesim operations
///
/// Covers configuration loading, provider interactions, the conversation
/// session, and gallery export.
#[derive(Error, Debug)]
pub enum CruiseSimError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (network, authentication, quota, malformed responses)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Missing credentials for provider
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// A transcript role that has no provider-side counterpart
    #[error("Role '{0}' cannot be sent to the provider")]
    UnmappedRole(String),

    /// Conversation session errors (store access, invalid transitions)
    #[error("Session error: {0}")]
    Session(String),

    /// Gallery export and image inspection errors
    #[error("Gallery error: {0}")]
    Gallery(String),

    /// Interactive command errors
    #[error("Command error: {0}")]
    Command(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Base64 decoding errors for inline image data
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Image decoding errors
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type alias for cruisesim operations
///
/// Uses `anyhow::Error` so callers can attach context while the typed
/// [`CruiseSimError`] stays recoverable through `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;
