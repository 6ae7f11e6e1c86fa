use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::Classifier;
use crate::contracts::types::{ClassifierRequest, ErrorBody};
use crate::error::ClassifierError;

pub const ENDPOINT_PATH: &str = "/api/get-recommendation";

/// Calls `POST <base>/api/get-recommendation`.
pub struct HttpClassifier {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpClassifier {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            endpoint: format!("{}{ENDPOINT_PATH}", base_url.trim_end_matches('/')),
            timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    fn id(&self) -> &'static str {
        "http"
    }

    async fn classify(&self, request: &ClassifierRequest) -> Result<Value, ClassifierError> {
        debug!(endpoint = %self.endpoint, cards = request.user_cards.len(), "calling classifier");
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    ClassifierError::Timeout(self.timeout.as_millis())
                } else {
                    ClassifierError::Unavailable(error.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status.to_string(),
            };
            return Err(ClassifierError::Unavailable(format!(
                "HTTP {}: {detail}",
                status.as_u16()
            )));
        }

        response.json::<Value>().await.map_err(|error| {
            if error.is_timeout() {
                ClassifierError::Timeout(self.timeout.as_millis())
            } else {
                ClassifierError::InvalidResponse(error.to_string())
            }
        })
    }
}
