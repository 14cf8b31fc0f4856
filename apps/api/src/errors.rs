use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Malformed model response: {0}")]
    ModelMalformedResponse(String),

    #[error("Malformed criteria: {0}")]
    MalformedCriteriaInput(String),

    #[error("No documents were supplied")]
    EmptyBatch,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("All {0} documents failed to score")]
    AllDocumentsFailed(usize),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code, used in error bodies and failed CSV rows.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            AppError::ExtractionFailed(_) => "EXTRACTION_FAILED",
            AppError::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
            AppError::ModelMalformedResponse(_) => "MODEL_MALFORMED_RESPONSE",
            AppError::MalformedCriteriaInput(_) => "MALFORMED_CRITERIA",
            AppError::EmptyBatch => "EMPTY_BATCH",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::AllDocumentsFailed(_) => "ALL_DOCUMENTS_FAILED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UnsupportedFormat(_)
            | AppError::ExtractionFailed(_)
            | AppError::MalformedCriteriaInput(_)
            | AppError::EmptyBatch
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::ModelUnavailable(_)
            | AppError::ModelMalformedResponse(_)
            | AppError::AllDocumentsFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps an LLM client failure onto the taxonomy. Only a reply that arrived
    /// but could not be parsed counts as malformed.
    pub fn from_llm(context: &str, err: LlmError) -> Self {
        match err {
            LlmError::Parse(e) => AppError::ModelMalformedResponse(format!("{context}: {e}")),
            other => AppError::ModelUnavailable(format!("{context}: {other}")),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::ModelUnavailable(msg) => {
                tracing::error!("Model unavailable: {msg}");
                "The language model could not be reached".to_string()
            }
            AppError::ModelMalformedResponse(msg) => {
                tracing::error!("Malformed model response: {msg}");
                "The language model returned an unusable response".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
