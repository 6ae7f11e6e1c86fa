use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LOG_FORMAT_ENV_VAR, ServerConfig};
use crate::inference::InferenceBackend;
use crate::inference::gemini::GeminiBackend;

pub struct AppState {
    pub backend: Arc<dyn InferenceBackend>,
    pub inference_timeout: Duration,
}

impl AppState {
    pub fn new(backend: Arc<dyn InferenceBackend>, inference_timeout: Duration) -> Self {
        Self {
            backend,
            inference_timeout,
        }
    }
}

/// Logs go to stderr in both formats.
pub fn init_tracing() {
    let log_format = std::env::var(LOG_FORMAT_ENV_VAR).unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub fn build_state(config: &ServerConfig) -> Arc<AppState> {
    let backend = GeminiBackend::new(&config.api_key, &config.model, config.inference_timeout);
    tracing::info!(backend = backend.id(), model = %config.model, "inference backend ready");
    Arc::new(AppState::new(Arc::new(backend), config.inference_timeout))
}
