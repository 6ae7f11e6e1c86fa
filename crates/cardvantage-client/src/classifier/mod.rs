//! The remote merchant classifier, seen from the client.
//!
//! Implementations return the raw response body; validation happens in
//! [`validate::validate_response`] so no implementation is trusted.

mod http;
pub mod validate;

use async_trait::async_trait;
use serde_json::Value;

use crate::contracts::types::ClassifierRequest;
use crate::error::ClassifierError;

pub use http::{ENDPOINT_PATH, HttpClassifier};

#[async_trait]
pub trait Classifier: Send + Sync {
    /// Short label used in logs.
    fn id(&self) -> &'static str;

    async fn classify(&self, request: &ClassifierRequest) -> Result<Value, ClassifierError>;
}

/// Stands in when no classifier endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledClassifier;

#[async_trait]
impl Classifier for DisabledClassifier {
    fn id(&self) -> &'static str {
        "disabled"
    }

    async fn classify(&self, _request: &ClassifierRequest) -> Result<Value, ClassifierError> {
        Err(ClassifierError::Unavailable(
            "no classifier endpoint configured".to_string(),
        ))
    }
}
