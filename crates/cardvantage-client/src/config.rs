use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::classifier::{Classifier, DisabledClassifier, HttpClassifier};
use crate::state::HOME_ENV_VAR;

pub const CLASSIFIER_URL_ENV_VAR: &str = "CARDVANTAGE_CLASSIFIER_URL";
pub const CLASSIFIER_TIMEOUT_ENV_VAR: &str = "CARDVANTAGE_CLASSIFIER_TIMEOUT_MS";

pub const DEFAULT_CLASSIFIER_URL: &str = "http://localhost:8080";
pub const DEFAULT_CLASSIFIER_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub home: Option<PathBuf>,
    /// `None` disables the remote classifier; every request uses the fallback.
    pub classifier_url: Option<String>,
    pub classifier_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            home: None,
            classifier_url: Some(DEFAULT_CLASSIFIER_URL.to_string()),
            classifier_timeout: DEFAULT_CLASSIFIER_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let home = lookup(HOME_ENV_VAR)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let classifier_url = match lookup(CLASSIFIER_URL_ENV_VAR) {
            Some(value) => parse_classifier_url(&value),
            None => Some(DEFAULT_CLASSIFIER_URL.to_string()),
        };
        let classifier_timeout = lookup(CLASSIFIER_TIMEOUT_ENV_VAR)
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|millis| *millis > 0)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_CLASSIFIER_TIMEOUT);

        Self {
            home,
            classifier_url,
            classifier_timeout,
        }
    }

    pub fn classifier(&self) -> Arc<dyn Classifier> {
        match &self.classifier_url {
            Some(url) => Arc::new(HttpClassifier::new(url, self.classifier_timeout)),
            None => Arc::new(DisabledClassifier),
        }
    }
}

fn parse_classifier_url(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("off")
        || trimmed.eq_ignore_ascii_case("none")
    {
        return None;
    }
    Some(trimmed.to_string())
}
