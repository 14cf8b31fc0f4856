//! CSV rendering of score rows.

use crate::criteria::models::{column_label, CriteriaSet};
use crate::errors::AppError;
use crate::scoring::models::{RowOutcome, ScoreRow};
use crate::scoring::reply::format_score;

pub const CANDIDATE_COLUMN: &str = "Candidate Name";
pub const TOTAL_COLUMN: &str = "Total Score";

/// Header row: candidate, one column per criterion in tier order, total.
pub fn csv_header(criteria: &CriteriaSet) -> Vec<String> {
    std::iter::once(CANDIDATE_COLUMN.to_string())
        .chain(criteria.criteria().map(|(tier, name)| column_label(tier, name)))
        .chain(std::iter::once(TOTAL_COLUMN.to_string()))
        .collect()
}

/// Renders the table. Failed rows keep their candidate name, leave the
/// criterion cells empty and carry the failure code in the total cell.
pub fn render_csv(criteria: &CriteriaSet, rows: &[ScoreRow]) -> Result<String, AppError> {
    let header = csv_header(criteria);
    let criterion_count = header.len() - 2;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&header).map_err(csv_error)?;

    for row in rows {
        let mut record = Vec::with_capacity(header.len());
        record.push(row.candidate_name.clone());
        match &row.outcome {
            RowOutcome::Scored(card) => {
                record.extend(card.scores().iter().map(|s| format_score(s.score)));
                record.push(format_score(card.total()));
            }
            RowOutcome::Failed(failure) => {
                record.extend(std::iter::repeat(String::new()).take(criterion_count));
                record.push(failure.code.to_string());
            }
        }
        writer.write_record(&record).map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("CSV flush failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(anyhow::anyhow!("CSV is not UTF-8: {e}")))
}

fn csv_error(e: csv::Error) -> AppError {
    AppError::Internal(anyhow::anyhow!("CSV write failed: {e}"))
}
