use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cardvantage_client::ClassifierError;
use cardvantage_client::contracts::types::ErrorBody;
use thiserror::Error;
use tracing::error;

use crate::inference::InferenceError;
use crate::repair::RepairError;

pub const MISSING_INPUT_MESSAGE: &str = "Missing URL or cards in request body.";
pub const MODEL_FAILURE_MESSAGE: &str = "Failed to process request with the AI model.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing URL or cards in request body.")]
    MissingInput,
    #[error("{0}")]
    Inference(#[from] InferenceError),
    #[error("{0}")]
    Repair(#[from] RepairError),
    #[error("{0}")]
    Validation(#[from] ClassifierError),
    #[error("prompt serialization failed: {0}")]
    Prompt(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingInput => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Every failure renders `{ "error": string }`. Model-side causes are logged
/// and replaced with one fixed message.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::MissingInput => MISSING_INPUT_MESSAGE.to_string(),
            cause => {
                error!(cause = %cause, "recommendation request failed");
                MODEL_FAILURE_MESSAGE.to_string()
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use cardvantage_client::ClassifierError;

    use super::ApiError;
    use crate::inference::InferenceError;

    #[test]
    fn only_missing_input_is_a_client_error() {
        assert_eq!(ApiError::MissingInput.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(InferenceError::EmptyResponse).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(ClassifierError::InvalidResponse("no survivors".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
