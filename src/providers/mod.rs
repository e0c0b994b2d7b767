//! Provider module for cruisesim
//!
//! This module contains the generative AI provider abstraction and the
//! Gemini implementation.

pub mod base;
pub mod gemini;

pub use base::{
    GeneratedImage, HistoryEntry, ImageRequest, Provider, ProviderRole, DEFAULT_ASPECT_RATIO,
    DEFAULT_IMAGE_MIME,
};
pub use gemini::GeminiProvider;

use crate::config::ProviderConfig;
use crate::error::{CruiseSimError, Result};

/// Provider types accepted by [`create_provider`]
pub const SUPPORTED_PROVIDERS: &[&str] = &["gemini"];

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `provider_type` - Type of provider ("gemini")
/// * `config` - Provider configuration
///
/// # Returns
///
/// Returns a boxed provider instance
///
/// # Errors
///
/// Returns error if provider type is invalid or initialization fails
///
/// # Examples
///
/// ```
/// use cruisesim::config::ProviderConfig;
/// use cruisesim::providers::create_provider;
///
/// let provider = create_provider("gemini", &ProviderConfig::default()).unwrap();
/// assert_eq!(provider.name(), "gemini");
/// assert!(create_provider("carrier-pigeon", &ProviderConfig::default()).is_err());
/// ```
pub fn create_provider(provider_type: &str, config: &ProviderConfig) -> Result<Box<dyn Provider>> {
    match provider_type {
        "gemini" => Ok(Box::new(GeminiProvider::new(config.gemini.clone())?)),
        _ => Err(CruiseSimError::Provider(format!(
            "Unknown provider type: {}. Must be one of: {}",
            provider_type,
            SUPPORTED_PROVIDERS.join(", ")
        ))
        .into()),
    }
}
