use serde::Serialize;

use crate::criteria::models::Tier;
use crate::errors::AppError;

/// Score for one criterion, already clamped into its tier's range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionScore {
    pub tier: Tier,
    pub criterion: String,
    pub score: f64,
}

impl CriterionScore {
    pub fn new(tier: Tier, criterion: impl Into<String>, score: f64) -> Self {
        Self {
            tier,
            criterion: criterion.into(),
            score,
        }
    }
}

/// Per-criterion scores for one resume. The total is always the local sum of
/// the scores; the model's own arithmetic is never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCard {
    scores: Vec<CriterionScore>,
    total: f64,
}

impl ScoreCard {
    pub fn new(scores: Vec<CriterionScore>) -> Self {
        let total = scores.iter().map(|s| s.score).sum();
        Self { scores, total }
    }

    pub fn scores(&self) -> &[CriterionScore] {
        &self.scores
    }

    pub fn total(&self) -> f64 {
        self.total
    }
}

/// Why a document produced no scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentFailure {
    pub code: &'static str,
    pub detail: String,
}

impl DocumentFailure {
    /// True when the model, not the upload, is to blame.
    pub fn is_model_failure(&self) -> bool {
        matches!(self.code, "MODEL_UNAVAILABLE" | "MODEL_MALFORMED_RESPONSE")
    }
}

impl From<&AppError> for DocumentFailure {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code(),
            detail: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowOutcome {
    Scored(ScoreCard),
    Failed(DocumentFailure),
}

/// One resume's result, one line of the output table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    pub candidate_name: String,
    pub outcome: RowOutcome,
}

impl ScoreRow {
    pub fn scored(candidate_name: impl Into<String>, card: ScoreCard) -> Self {
        Self {
            candidate_name: candidate_name.into(),
            outcome: RowOutcome::Scored(card),
        }
    }

    pub fn failed(candidate_name: impl Into<String>, err: &AppError) -> Self {
        Self {
            candidate_name: candidate_name.into(),
            outcome: RowOutcome::Failed(err.into()),
        }
    }

    pub fn card(&self) -> Option<&ScoreCard> {
        match &self.outcome {
            RowOutcome::Scored(card) => Some(card),
            RowOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&DocumentFailure> {
        match &self.outcome {
            RowOutcome::Scored(_) => None,
            RowOutcome::Failed(failure) => Some(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_sum_of_scores() {
        let card = ScoreCard::new(vec![
            CriterionScore::new(Tier::MustHave, "a", 7.5),
            CriterionScore::new(Tier::GoodToHave, "b", 3.0),
            CriterionScore::new(Tier::NiceToHave, "c", 1.5),
        ]);
        assert_eq!(card.total(), 12.0);
        let sum: f64 = card.scores().iter().map(|s| s.score).sum();
        assert_eq!(card.total(), sum);
    }

    #[test]
    fn test_empty_card_totals_zero() {
        assert_eq!(ScoreCard::new(vec![]).total(), 0.0);
    }

    #[test]
    fn test_failed_row_carries_error_code() {
        let row = ScoreRow::failed("jane", &AppError::ExtractionFailed("corrupt".into()));
        assert!(row.card().is_none());
        assert_eq!(row.failure().unwrap().code, "EXTRACTION_FAILED");
    }
}
