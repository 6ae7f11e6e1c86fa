use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::HeaderValue,
    routing::{get, post},
};
use cardvantage_client::classifier::ENDPOINT_PATH;
use cardvantage_client::classifier::validate::validate_response;
use cardvantage_client::contracts::types::{CardRef, ClassifierRequest, RecommendationResult};
use serde_json::{Value, json};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult};
use crate::inference::{InferenceBackend, InferenceError};
use crate::main_lib::AppState;
use crate::prompt::build_prompt;
use crate::repair::parse_model_output;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Accepts the body only when `websiteUrl` is a non-empty string and
/// `userCards` holds at least one named card.
fn parse_request(body: Option<Value>) -> ApiResult<ClassifierRequest> {
    let body = body.ok_or(ApiError::MissingInput)?;

    let website_url = body
        .get("websiteUrl")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ApiError::MissingInput)?;

    let user_cards: Vec<CardRef> = body
        .get("userCards")
        .and_then(Value::as_array)
        .ok_or(ApiError::MissingInput)?
        .iter()
        .filter_map(|card| card.get("name").and_then(Value::as_str))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| CardRef {
            name: name.to_string(),
        })
        .collect();

    if user_cards.is_empty() {
        return Err(ApiError::MissingInput);
    }

    Ok(ClassifierRequest {
        website_url: website_url.to_string(),
        user_cards,
    })
}

async fn get_recommendation(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<RecommendationResult>> {
    let request = parse_request(payload.ok().map(|Json(body)| body))?;
    let prompt = build_prompt(&request.website_url, &request.user_cards)?;

    let raw = tokio::time::timeout(state.inference_timeout, state.backend.generate(&prompt))
        .await
        .map_err(|_| InferenceError::Timeout(state.inference_timeout.as_millis()))??;

    let body = parse_model_output(&raw)?;
    let result = validate_response(&body, &request.card_names()).inspect_err(|error| {
        warn!(
            website_url = %request.website_url,
            fault = error.kind(),
            "model answer failed validation"
        );
    })?;

    info!(
        website_url = %request.website_url,
        backend = state.backend.id(),
        category = %result.category,
        recommended = result.recommendations.len(),
        "recommendation served"
    );
    Ok(Json(result))
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.cors_allow.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allow
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn app_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    Router::new()
        .route(ENDPOINT_PATH, post(get_recommendation))
        .route("/health", get(health))
        .with_state(state)
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}
