#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use cardvantage_server::AppState;
use cardvantage_server::api::app_router;
use cardvantage_server::config::ServerConfig;
use cardvantage_server::inference::{InferenceBackend, InferenceError};
use tokio::net::TcpListener;

/// Replies with fixed text (or a failure) and records every prompt.
pub struct ScriptedBackend {
    reply: Result<String, String>,
    delay: Duration,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            delay: Duration::ZERO,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(detail: &str) -> Self {
        Self {
            reply: Err(detail.to_string()),
            delay: Duration::ZERO,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl InferenceBackend for ScriptedBackend {
    fn id(&self) -> &'static str {
        "scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reply.clone().map_err(InferenceError::Transport)
    }
}

pub fn test_config(cors: Option<&str>) -> Option<ServerConfig> {
    let cors = cors.map(str::to_string);
    ServerConfig::from_lookup(|name| match name {
        "GEMINI_API_KEY" => Some("test-key".to_string()),
        "CARDVANTAGE_CORS_ALLOW_ORIGINS" => cors.clone(),
        _ => None,
    })
    .ok()
}

/// Serves the app on an ephemeral local port.
pub async fn spawn_app(
    backend: Arc<dyn InferenceBackend>,
    inference_timeout: Duration,
    cors: Option<&str>,
) -> Option<SocketAddr> {
    let config = test_config(cors)?;
    let state = Arc::new(AppState::new(backend, inference_timeout));
    let router = app_router(state, &config);
    let listener = TcpListener::bind("127.0.0.1:0").await.ok()?;
    let addr = listener.local_addr().ok()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Some(addr)
}

pub const DINING_ANSWER: &str = r#"```json
{
  "category": "Dining",
  "recommendations": [
    {"cardName": "Amex Gold", "reason": "4x points at restaurants.", "rewardRate": "4x points"},
    {"cardName": "Card Nobody Owns", "reason": "Invented.", "rewardRate": "10x"},
    {"cardName": "Citi Double Cash", "reason": "2% on everything.", "rewardRate": 2}
  ]
}
```"#;
