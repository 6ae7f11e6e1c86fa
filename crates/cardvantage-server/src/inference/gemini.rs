use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use super::{InferenceBackend, InferenceError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Gemini `generateContent`, asked for a JSON-only answer.
pub struct GeminiBackend {
    client: Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl GeminiBackend {
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, model, timeout)
    }

    pub fn with_base_url(base_url: &str, api_key: &str, model: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            endpoint: format!(
                "{}/v1beta/models/{model}:generateContent",
                base_url.trim_end_matches('/')
            ),
            api_key: api_key.to_string(),
            timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

fn request_body(prompt: &str) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }],
        }],
        "generationConfig": {
            "response_mime_type": "application/json",
        },
    })
}

/// Concatenates the text parts of the first candidate.
fn candidate_text(response: GenerateContentResponse) -> Result<String, InferenceError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(InferenceError::EmptyResponse);
    }
    Ok(text)
}

fn error_detail(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[async_trait]
impl InferenceBackend for GeminiBackend {
    fn id(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        debug!(endpoint = %self.endpoint, prompt_chars = prompt.len(), "calling gemini");
        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request_body(prompt))
            .send()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    InferenceError::Timeout(self.timeout.as_millis())
                } else {
                    InferenceError::Transport(error.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Status {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        let decoded = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|error| InferenceError::Decode(error.to_string()))?;
        candidate_text(decoded)
    }
}
