//! Gemini provider implementation for cruisesim
//!
//! This module implements the Provider trait over the Gemini
//! `models/{model}:generateContent` REST endpoint. Replies use the chat
//! model with the captain persona as system instruction; ship renders use
//! the image model and come back as inline base64 data.

use crate::config::GeminiConfig;
use crate::error::{CruiseSimError, Result};
use crate::prompts::CAPTAIN_SYSTEM_PROMPT;
use crate::providers::{
    GeneratedImage, HistoryEntry, ImageRequest, Provider, ProviderRole, DEFAULT_IMAGE_MIME,
};

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini API provider
///
/// # Examples
///
/// ```no_run
/// use cruisesim::config::GeminiConfig;
/// use cruisesim::providers::{GeminiProvider, Provider};
///
/// # async fn example() -> cruisesim::error::Result<()> {
/// let config = GeminiConfig {
///     api_key: Some("secret".to_string()),
///     ..Default::default()
/// };
/// let provider = GeminiProvider::new(config)?;
/// let reply = provider.generate_reply("Ahoy captain!", &[]).await?;
/// println!("{}", reply);
/// # Ok(())
/// # }
/// ```
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

/// Request body for generateContent
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// A role-tagged list of parts
#[derive(Debug, Default, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

/// Text or inline binary payload
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "inline_data")]
    inline_data: Option<GeminiInlineData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
}

/// Inline base64 blob
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    #[serde(default, alias = "mime_type")]
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

/// Generation settings for image requests
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
    image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
}

/// Response body from generateContent
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GeminiContent {
    fn text(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![GeminiPart {
                text: Some(text.into()),
                ..Default::default()
            }],
        }
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider instance
    ///
    /// A missing API key is not an error here; every call reports
    /// `MissingCredentials` instead.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use cruisesim::config::GeminiConfig;
    /// use cruisesim::providers::GeminiProvider;
    ///
    /// let provider = GeminiProvider::new(GeminiConfig::default());
    /// assert!(provider.is_ok());
    /// ```
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("cruisesim/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CruiseSimError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        if config.api_key.is_none() {
            tracing::warn!("No Gemini API key configured; provider calls will fail");
        }

        tracing::info!(
            "Initialized Gemini provider: api_base={}, chat_model={}, image_model={}",
            config.api_base,
            config.chat_model,
            config.image_model
        );

        Ok(Self { client, config })
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| CruiseSimError::MissingCredentials("gemini".to_string()).into())
    }

    fn endpoint_for_model(&self, model: &str) -> String {
        let trimmed = model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{}", trimmed)
        };
        format!(
            "{}/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            model_path
        )
    }

    fn build_reply_request(user_text: &str, history: &[HistoryEntry]) -> GenerateContentRequest {
        let mut contents: Vec<GeminiContent> = history
            .iter()
            .map(|entry| {
                let role = match entry.role {
                    ProviderRole::User => "user",
                    ProviderRole::Model => "model",
                };
                GeminiContent::text(role, entry.text.clone())
            })
            .collect();
        contents.push(GeminiContent::text("user", user_text));

        GenerateContentRequest {
            system_instruction: Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: Some(CAPTAIN_SYSTEM_PROMPT.to_string()),
                    ..Default::default()
                }],
            }),
            contents,
            generation_config: None,
        }
    }

    fn build_image_request(request: &ImageRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: None,
            contents: vec![GeminiContent::text("user", request.prompt.clone())],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
                image_config: ImageConfig {
                    aspect_ratio: request.aspect_ratio.clone(),
                },
            }),
        }
    }

    /// Joins the non-thought text parts of the first candidate
    fn extract_text(response: &GenerateContentResponse) -> String {
        response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|part| !part.thought.unwrap_or(false))
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Returns the first inline image of the first candidate
    fn extract_image(response: &GenerateContentResponse) -> Result<Option<GeneratedImage>> {
        let Some(content) = response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
        else {
            return Ok(None);
        };

        let Some(inline) = content
            .parts
            .iter()
            .filter_map(|part| part.inline_data.as_ref())
            .find(|inline| !inline.data.is_empty())
        else {
            return Ok(None);
        };

        base64::engine::general_purpose::STANDARD
            .decode(inline.data.as_bytes())
            .map_err(|e| CruiseSimError::Provider(format!("Gemini returned malformed image data: {}", e)))?;

        let mime_type = inline
            .mime_type
            .clone()
            .filter(|mime| !mime.is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string());

        Ok(Some(GeneratedImage::new(mime_type, inline.data.clone())))
    }

    async fn post_generate(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let api_key = self.api_key()?;
        let url = self.endpoint_for_model(model);

        tracing::debug!(
            "Sending Gemini request: model={}, contents={}",
            model,
            body.contents.len()
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(body)
            .send()
            .await
            .map_err(|e| {
                // the URL carries the API key
                let e = e.without_url();
                tracing::error!("Gemini request failed: {}", e);
                CruiseSimError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<GeminiErrorEnvelope>(&error_text)
                .map(|envelope| match envelope.error.status {
                    Some(code) => format!("{} ({})", envelope.error.message, code),
                    None => envelope.error.message,
                })
                .unwrap_or(error_text);
            tracing::error!("Gemini returned error {}: {}", status, detail);
            return Err(CruiseSimError::Provider(format!(
                "Gemini returned error {}: {}",
                status, detail
            ))
            .into());
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            let e = e.without_url();
            tracing::error!("Failed to parse Gemini response: {}", e);
            CruiseSimError::Provider(format!("Failed to parse Gemini response: {}", e))
        })?;

        if let Some(reason) = parsed
            .candidates
            .first()
            .and_then(|candidate| candidate.finish_reason.as_deref())
        {
            tracing::debug!("Gemini finish reason: {}", reason);
        }

        Ok(parsed)
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn generate_reply(&self, user_text: &str, history: &[HistoryEntry]) -> Result<String> {
        let body = Self::build_reply_request(user_text, history);
        let response = self.post_generate(&self.config.chat_model, &body).await?;
        let text = Self::extract_text(&response);
        tracing::debug!("Gemini reply: {} chars", text.len());
        Ok(text)
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<Option<GeneratedImage>> {
        let body = Self::build_image_request(request);
        let response = self.post_generate(&self.config.image_model, &body).await?;
        let image = Self::extract_image(&response)?;
        match &image {
            Some(found) => tracing::debug!(
                "Gemini image: mime={}, {} base64 chars",
                found.mime_type,
                found.data.len()
            ),
            None => tracing::info!("Gemini answered without an image"),
        }
        Ok(image)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleHint;
    use serde_json::json;

    fn provider(api_key: Option<&str>) -> GeminiProvider {
        GeminiProvider::new(GeminiConfig {
            api_key: api_key.map(str::to_string),
            ..Default::default()
        })
        .unwrap()
    }

    fn parse(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_endpoint_for_model() {
        let provider = provider(None);
        assert_eq!(
            provider.endpoint_for_model("gemini-2.5-flash-image"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
        assert_eq!(
            provider.endpoint_for_model("models/custom"),
            "https://generativelanguage.googleapis.com/v1beta/models/custom:generateContent"
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let provider = GeminiProvider::new(GeminiConfig {
            api_base: "http://localhost:9000/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            provider.endpoint_for_model("m"),
            "http://localhost:9000/models/m:generateContent"
        );
    }

    #[test]
    fn test_reply_request_shape() {
        let history = vec![
            HistoryEntry::new(ProviderRole::Model, "Ahoy!"),
            HistoryEntry::new(ProviderRole::User, "hi"),
        ];
        let body = serde_json::to_value(GeminiProvider::build_reply_request("build a ship", &history))
            .unwrap();

        assert_eq!(body["contents"].as_array().unwrap().len(), 3);
        assert_eq!(body["contents"][0]["role"], "model");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Ahoy!");
        assert_eq!(body["contents"][2]["role"], "user");
        assert_eq!(body["contents"][2]["parts"][0]["text"], "build a ship");
        assert!(body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Virtual Captain"));
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_image_request_shape() {
        let request = ImageRequest::new("blocky ship", StyleHint::Blocky);
        let body = serde_json::to_value(GeminiProvider::build_image_request(&request)).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "blocky ship");
        assert_eq!(body["generationConfig"]["imageConfig"]["aspectRatio"], "16:9");
        assert_eq!(
            body["generationConfig"]["responseModalities"],
            json!(["TEXT", "IMAGE"])
        );
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_extract_text_joins_parts_and_skips_thoughts() {
        let response = parse(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "planning the route", "thought": true },
                        { "text": "Ahoy, " },
                        { "text": "matey!" }
                    ]
                },
                "finishReason": "STOP"
            }]
        }));
        assert_eq!(GeminiProvider::extract_text(&response), "Ahoy, matey!");
    }

    #[test]
    fn test_extract_text_empty_without_candidates() {
        let response = parse(json!({}));
        assert_eq!(GeminiProvider::extract_text(&response), "");
    }

    #[test]
    fn test_extract_image_camel_case() {
        let response = parse(json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Here you go" },
                        { "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } }
                    ]
                }
            }]
        }));
        let image = GeminiProvider::extract_image(&response).unwrap().unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, "iVBORw0KGgo=");
    }

    #[test]
    fn test_extract_image_snake_case_and_default_mime() {
        let response = parse(json!({
            "candidates": [{
                "content": { "parts": [ { "inline_data": { "data": "AAAA" } } ] }
            }]
        }));
        let image = GeminiProvider::extract_image(&response).unwrap().unwrap();
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn test_extract_image_none_when_text_only() {
        let response = parse(json!({
            "candidates": [{ "content": { "parts": [ { "text": "no picture today" } ] } }]
        }));
        assert!(GeminiProvider::extract_image(&response).unwrap().is_none());
    }

    #[test]
    fn test_extract_image_rejects_malformed_base64() {
        let response = parse(json!({
            "candidates": [{
                "content": { "parts": [ { "inlineData": { "mimeType": "image/png", "data": "%%%" } } ] }
            }]
        }));
        assert!(GeminiProvider::extract_image(&response).is_err());
    }

    #[tokio::test]
    async fn test_generate_reply_without_key_reports_missing_credentials() {
        let provider = provider(None);
        let err = provider.generate_reply("hello", &[]).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CruiseSimError>(),
            Some(CruiseSimError::MissingCredentials(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_image_with_blank_key_reports_missing_credentials() {
        let provider = provider(Some("   "));
        let request = ImageRequest::new("ship", StyleHint::Blocky);
        let err = provider.generate_image(&request).await.unwrap_err();
        assert!(err.to_string().contains("Missing credentials"));
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(provider(Some("k")).name(), "gemini");
    }
}
