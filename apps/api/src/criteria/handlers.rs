//! Axum route handler for criteria extraction.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::criteria::extractor::extract_criteria;
use crate::criteria::models::CriteriaSet;
use crate::documents::upload::read_form;
use crate::errors::AppError;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct ExtractCriteriaResponse {
    pub criteria: CriteriaSet,
}

/// POST /extract-criteria
///
/// Multipart body with one `file` field holding a PDF or DOCX job description.
pub async fn handle_extract_criteria(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractCriteriaResponse>, AppError> {
    let form = read_form(multipart, &[FILE_FIELD]).await?;
    let document = form
        .documents
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Validation(format!("multipart field '{FILE_FIELD}' is required")))?;

    let criteria = extract_criteria(
        &document,
        state.extractor.as_ref(),
        state.oracle.as_ref(),
        state.config.llm_timeout,
    )
    .await?;

    Ok(Json(ExtractCriteriaResponse { criteria }))
}
