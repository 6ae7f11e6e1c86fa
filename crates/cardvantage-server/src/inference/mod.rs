//! Text generation backends that answer the classification prompt.

pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("inference request failed: {0}")]
    Transport(String),
    #[error("inference backend returned HTTP {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("inference response carried no text")]
    EmptyResponse,
    #[error("inference response could not be decoded: {0}")]
    Decode(String),
    #[error("inference timed out after {0} ms")]
    Timeout(u128),
}

#[async_trait]
pub trait InferenceBackend: Send + Sync {
    fn id(&self) -> &'static str;

    /// Returns the model's raw text for one prompt.
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError>;
}
