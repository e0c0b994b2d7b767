//! Base provider trait and common types for cruisesim
//!
//! This module defines the Provider trait that generative AI backends must
//! implement, along with the history, image request and image result types
//! exchanged with them.

use crate::error::Result;
use crate::style::StyleHint;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default aspect ratio for ship renders
pub const DEFAULT_ASPECT_RATIO: &str = "16:9";

/// Default MIME type when the provider does not report one
pub const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Speaker of a history entry as the provider sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderRole {
    /// Turns written by the person chatting
    User,
    /// Turns produced by the model
    Model,
}

impl fmt::Display for ProviderRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Model => write!(f, "model"),
        }
    }
}

/// One prior turn sent along with a reply request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Provider-side role
    pub role: ProviderRole,
    /// Turn text
    pub text: String,
}

impl HistoryEntry {
    /// Creates a history entry
    ///
    /// # Examples
    ///
    /// ```
    /// use cruisesim::providers::{HistoryEntry, ProviderRole};
    ///
    /// let entry = HistoryEntry::new(ProviderRole::Model, "Ahoy!");
    /// assert_eq!(entry.role, ProviderRole::Model);
    /// assert_eq!(entry.text, "Ahoy!");
    /// ```
    pub fn new(role: ProviderRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// Image generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    /// Full styled prompt sent to the image model
    pub prompt: String,
    /// Aesthetic the prompt was built for
    pub style: StyleHint,
    /// Aspect ratio such as "16:9"
    pub aspect_ratio: String,
}

impl ImageRequest {
    /// Creates a request with the default 16:9 aspect ratio
    pub fn new(prompt: impl Into<String>, style: StyleHint) -> Self {
        Self {
            prompt: prompt.into(),
            style,
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
        }
    }

    /// Overrides the aspect ratio
    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = aspect_ratio.into();
        self
    }
}

/// Inline image returned by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// MIME type of the encoded image
    pub mime_type: String,
    /// Base64-encoded image bytes
    pub data: String,
}

impl GeneratedImage {
    /// Creates an image from base64 data
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Renders the image as a data URI
    ///
    /// # Examples
    ///
    /// ```
    /// use cruisesim::providers::GeneratedImage;
    ///
    /// let image = GeneratedImage::new("image/png", "iVBORw0KGgo=");
    /// assert_eq!(image.to_data_uri(), "data:image/png;base64,iVBORw0KGgo=");
    /// ```
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Generative AI backend used by the orchestrator
///
/// Implementations must be safe to share across tasks. Every failure is
/// reported as an error and treated by the caller as a single provider
/// failure kind.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Produces the captain's reply to `user_text` given the prior turns
    ///
    /// # Arguments
    ///
    /// * `user_text` - The new user message
    /// * `history` - Earlier turns, oldest first, excluding `user_text`
    ///
    /// # Returns
    ///
    /// Returns the reply text, possibly empty
    ///
    /// # Errors
    ///
    /// Returns error on network, authentication, quota or malformed responses
    async fn generate_reply(&self, user_text: &str, history: &[HistoryEntry]) -> Result<String>;

    /// Produces at most one image for the request
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` when the provider answered without an image
    ///
    /// # Errors
    ///
    /// Returns error on network, authentication, quota or malformed responses
    async fn generate_image(&self, request: &ImageRequest) -> Result<Option<GeneratedImage>>;

    /// Short provider name used in logs
    fn name(&self) -> &str {
        "provider"
    }
}
