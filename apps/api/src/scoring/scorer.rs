//! Resume scoring with one model call per document, rows in input order.
//!
//! Documents are scored through an ordered bounded stream: at most
//! `concurrency` documents are in flight and results come back in submission
//! order. A failing document becomes a failed row; the batch carries on.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::criteria::models::CriteriaSet;
use crate::documents::candidate::derive_candidate_name;
use crate::documents::{ensure_text, Document, TextExtractor};
use crate::errors::AppError;
use crate::llm_client::{complete_within, CompletionOracle};
use crate::scoring::models::{ScoreCard, ScoreRow};
use crate::scoring::reply::{build_scoring_prompt, parse_scoring_reply};

#[derive(Debug, Clone)]
pub struct ScoringOptions {
    pub concurrency: usize,
    pub model_timeout: Duration,
}

impl ScoringOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            concurrency: config.scoring_concurrency,
            model_timeout: config.llm_timeout,
        }
    }
}

/// Scores every document against `criteria`. Fails only on an empty batch.
pub async fn score_resumes(
    criteria: &CriteriaSet,
    documents: &[Document],
    extractor: &dyn TextExtractor,
    oracle: &dyn CompletionOracle,
    options: &ScoringOptions,
) -> Result<Vec<ScoreRow>, AppError> {
    if documents.is_empty() {
        return Err(AppError::EmptyBatch);
    }
    if criteria.is_empty() {
        warn!("Criteria set is empty; every total will be 0");
    }

    info!(
        documents = documents.len(),
        criteria = criteria.len(),
        concurrency = options.concurrency,
        "Scoring resumes"
    );

    let jobs: Vec<_> = documents
        .iter()
        .enumerate()
        .map(|(index, document)| {
            score_document(index, criteria, document, extractor, oracle, options.model_timeout)
        })
        .collect();
    let rows: Vec<ScoreRow> = stream::iter(jobs)
        .buffered(options.concurrency.max(1))
        .collect()
        .await;

    let failed = rows.iter().filter(|r| r.failure().is_some()).count();
    info!(
        scored = rows.len() - failed,
        failed,
        "Finished scoring batch"
    );
    Ok(rows)
}

async fn score_document(
    index: usize,
    criteria: &CriteriaSet,
    document: &Document,
    extractor: &dyn TextExtractor,
    oracle: &dyn CompletionOracle,
    timeout: Duration,
) -> ScoreRow {
    let candidate_name = derive_candidate_name(&document.filename);

    match try_score_document(&candidate_name, criteria, document, extractor, oracle, timeout).await
    {
        Ok(card) => {
            info!(index, candidate = %candidate_name, total = card.total(), "Scored resume");
            ScoreRow::scored(candidate_name, card)
        }
        Err(err) => {
            warn!(
                index,
                candidate = %candidate_name,
                document = %document.filename,
                error = %err,
                "Resume could not be scored"
            );
            ScoreRow::failed(candidate_name, &err)
        }
    }
}

async fn try_score_document(
    candidate_name: &str,
    criteria: &CriteriaSet,
    document: &Document,
    extractor: &dyn TextExtractor,
    oracle: &dyn CompletionOracle,
    timeout: Duration,
) -> Result<ScoreCard, AppError> {
    document.format()?;
    let resume_text = ensure_text(&document.filename, extractor.extract(document).await?)?;

    let prompt = build_scoring_prompt(candidate_name, &resume_text, criteria)?;
    let reply = complete_within(oracle, &prompt, timeout)
        .await
        .map_err(|e| AppError::from_llm(&format!("scoring {}", document.filename), e))?;

    parse_scoring_reply(candidate_name, &reply, criteria).map_err(|e| {
        error!(document = %document.filename, reply = %reply, "Unusable scoring reply");
        e
    })
}
