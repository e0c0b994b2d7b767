//! Test utilities for cruisesim
//!
//! This module provides a scriptable mock provider, a tiny PNG fixture and
//! assertion helpers shared by the unit tests.

use crate::config::Config;
use crate::error::{CruiseSimError, Result};
use crate::providers::{GeneratedImage, HistoryEntry, ImageRequest, Provider};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// Base64 of a 1x1 PNG
pub const TINY_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// A 1x1 PNG as a provider image
pub fn tiny_png_image() -> GeneratedImage {
    GeneratedImage::new("image/png", TINY_PNG_BASE64)
}

/// A 1x1 PNG as a data URI
pub fn tiny_png_data_uri() -> String {
    tiny_png_image().to_data_uri()
}

/// Mock provider returning canned results and recording every call
///
/// Image calls return the configured image, or `None` when none was set.
pub struct ScriptedProvider {
    reply: String,
    image: Option<GeneratedImage>,
    fail_reply: bool,
    fail_image: bool,
    delay: Option<Duration>,
    gate: Option<Arc<Notify>>,
    histories: Mutex<Vec<Vec<HistoryEntry>>>,
    image_requests: Mutex<Vec<ImageRequest>>,
}

impl ScriptedProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            image: None,
            fail_reply: false,
            fail_image: false,
            delay: None,
            gate: None,
            histories: Mutex::new(Vec::new()),
            image_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_image(mut self, image: GeneratedImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn failing_reply(mut self) -> Self {
        self.fail_reply = true;
        self
    }

    pub fn failing_image(mut self) -> Self {
        self.fail_image = true;
        self
    }

    /// Sleeps before answering a reply request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Holds every reply request until the gate is notified
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// History passed with each reply request, in call order
    pub fn histories(&self) -> Vec<Vec<HistoryEntry>> {
        self.histories.lock().unwrap().clone()
    }

    pub fn reply_count(&self) -> usize {
        self.histories.lock().unwrap().len()
    }

    pub fn image_requests(&self) -> Vec<ImageRequest> {
        self.image_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn generate_reply(&self, _user_text: &str, history: &[HistoryEntry]) -> Result<String> {
        self.histories.lock().unwrap().push(history.to_vec());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_reply {
            return Err(CruiseSimError::Provider("scripted reply failure".to_string()).into());
        }
        Ok(self.reply.clone())
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<Option<GeneratedImage>> {
        self.image_requests.lock().unwrap().push(request.clone());

        if self.fail_image {
            return Err(CruiseSimError::Provider("scripted image failure".to_string()).into());
        }
        Ok(self.image.clone())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Create a test configuration pointed at a local API base
pub fn test_config(api_base: &str) -> Config {
    let mut config = Config::default();
    config.provider.gemini.api_base = api_base.to_string();
    config.provider.gemini.api_key = Some("test-key".to_string());
    config.provider.gemini.timeout_seconds = 5;
    config
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleHint;
    use base64::Engine;

    #[test]
    fn test_tiny_png_decodes() {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(TINY_PNG_BASE64)
            .unwrap();
        let image = image::load_from_memory(&bytes).unwrap();
        assert_eq!((image.width(), image.height()), (1, 1));
    }

    #[test]
    fn test_tiny_png_data_uri() {
        assert!(tiny_png_data_uri().starts_with("data:image/png;base64,iVBOR"));
    }

    #[tokio::test]
    async fn test_scripted_provider_records_calls() {
        let provider = ScriptedProvider::new("ahoy").with_image(tiny_png_image());
        assert_eq!(provider.generate_reply("hi", &[]).await.unwrap(), "ahoy");
        let image = provider
            .generate_image(&ImageRequest::new("p", StyleHint::Blocky))
            .await
            .unwrap();
        assert!(image.is_some());
        assert_eq!(provider.reply_count(), 1);
        assert_eq!(provider.image_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_scripted_provider_failures() {
        let provider = ScriptedProvider::new("x").failing_reply().failing_image();
        assert_error_contains(provider.generate_reply("hi", &[]).await, "scripted reply");
        assert_error_contains(
            provider
                .generate_image(&ImageRequest::new("p", StyleHint::Blocky))
                .await,
            "scripted image",
        );
    }

    #[test]
    fn test_test_config_is_valid() {
        let config = test_config("http://127.0.0.1:1");
        assert!(config.validate().is_ok());
        assert_eq!(config.provider.gemini.api_key.as_deref(), Some("test-key"));
    }

    #[test]
    #[should_panic(expected = "does not contain")]
    fn test_assert_error_contains_wrong_message() {
        let result: Result<()> = Err(CruiseSimError::Config("different error".to_string()).into());
        assert_error_contains(result, "not present");
    }
}
