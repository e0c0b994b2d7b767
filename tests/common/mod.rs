use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cruisesim::config::GeminiConfig;

/// Base64 of a 1x1 PNG
#[allow(dead_code)]
pub const TINY_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

#[allow(dead_code)]
pub const TEST_API_KEY: &str = "test-key";

#[allow(dead_code)]
pub const CHAT_PATH: &str = "/models/gemini-3-flash-preview:generateContent";

#[allow(dead_code)]
pub const IMAGE_PATH: &str = "/models/gemini-2.5-flash-image:generateContent";

/// Gemini config pointed at a mock server
#[allow(dead_code)]
pub fn gemini_config(server: &MockServer) -> GeminiConfig {
    GeminiConfig {
        api_base: server.uri(),
        api_key: Some(TEST_API_KEY.to_string()),
        timeout_seconds: 5,
        ..Default::default()
    }
}

/// generateContent body with a single text part
#[allow(dead_code)]
pub fn text_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

/// generateContent body with a caption and an inline PNG
#[allow(dead_code)]
pub fn image_response() -> Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    { "text": "Here is your ship" },
                    { "inlineData": { "mimeType": "image/png", "data": TINY_PNG_BASE64 } }
                ]
            },
            "finishReason": "STOP"
        }]
    })
}

#[allow(dead_code)]
pub async fn mount_chat(server: &MockServer, response: ResponseTemplate, expected: u64) {
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(query_param("key", TEST_API_KEY))
        .respond_with(response)
        .expect(expected)
        .mount(server)
        .await;
}

#[allow(dead_code)]
pub async fn mount_image(server: &MockServer, response: ResponseTemplate, expected: u64) {
    Mock::given(method("POST"))
        .and(path(IMAGE_PATH))
        .and(query_param("key", TEST_API_KEY))
        .respond_with(response)
        .expect(expected)
        .mount(server)
        .await;
}

/// JSON bodies of every request the server received for a path
#[allow(dead_code)]
pub async fn request_bodies(server: &MockServer, request_path: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == request_path)
        .map(|request| serde_json::from_slice(&request.body).expect("request body is JSON"))
        .collect()
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
