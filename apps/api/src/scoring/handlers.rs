//! Axum route handler for resume scoring.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::criteria::models::CriteriaSet;
use crate::documents::upload::read_form;
use crate::errors::AppError;
use crate::scoring::models::{DocumentFailure, ScoreRow};
use crate::scoring::report::render_csv;
use crate::scoring::scorer::{score_resumes, ScoringOptions};
use crate::state::AppState;

const CRITERIA_FIELD: &str = "criteria";
const FILES_FIELD: &str = "files";
pub const FAILED_DOCUMENTS_HEADER: &str = "x-failed-documents";

/// POST /score-resumes
///
/// Multipart body: a `criteria` JSON text field and one or more `files`.
/// Responds with a CSV attachment, one row per file in upload order.
pub async fn handle_score_resumes(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = read_form(multipart, &[FILES_FIELD]).await?;

    let raw_criteria = form.text(CRITERIA_FIELD).ok_or_else(|| {
        AppError::MalformedCriteriaInput(format!("multipart field '{CRITERIA_FIELD}' is required"))
    })?;
    let criteria = CriteriaSet::from_input(raw_criteria)?;

    let rows = score_resumes(
        &criteria,
        &form.documents,
        state.extractor.as_ref(),
        state.oracle.as_ref(),
        &ScoringOptions::from_config(&state.config),
    )
    .await?;

    let failures: Vec<&DocumentFailure> = rows.iter().filter_map(ScoreRow::failure).collect();
    let failed = failures.len();
    if failed == rows.len() {
        return Err(batch_failure(&failures));
    }

    let csv = render_csv(&criteria, &rows)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=scores.csv".to_string(),
            ),
            (
                header::HeaderName::from_static(FAILED_DOCUMENTS_HEADER),
                failed.to_string(),
            ),
        ],
        csv,
    )
        .into_response())
}

/// Error for a batch in which no document scored. Only model trouble is a
/// gateway failure; a batch of unreadable uploads is the client's problem.
fn batch_failure(failures: &[&DocumentFailure]) -> AppError {
    let count = failures.len();
    if failures.iter().any(|f| f.is_model_failure()) {
        return AppError::AllDocumentsFailed(count);
    }
    if failures.iter().all(|f| f.code == "UNSUPPORTED_FORMAT") {
        AppError::UnsupportedFormat(format!("none of the {count} files is a PDF or DOCX"))
    } else {
        AppError::ExtractionFailed(format!("no text could be read from any of the {count} files"))
    }
}
