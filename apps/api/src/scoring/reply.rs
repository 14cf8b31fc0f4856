//! Scoring prompt construction and reply parsing.
//!
//! The model is asked for per-criterion scores plus a total. Scores are read
//! back in `CriteriaSet` order, clamped into tier range, and summed locally;
//! the model's total is only compared, never trusted.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::criteria::models::{CriteriaSet, Tier};
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{parse_json_reply, render_template, Prompt};
use crate::scoring::models::{CriterionScore, ScoreCard};
use crate::scoring::prompts::{SCORING_PROMPT_TEMPLATE, SCORING_SYSTEM, SCORING_TEMPERATURE};

/// Totals closer than this are treated as equal.
const TOTAL_TOLERANCE: f64 = 1e-6;

pub fn build_scoring_prompt(
    candidate_name: &str,
    resume_text: &str,
    criteria: &CriteriaSet,
) -> Result<Prompt, AppError> {
    let criteria_json = serde_json::to_string_pretty(criteria)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("criteria serialization failed: {e}")))?;

    let must_max = format_score(Tier::MustHave.max_score());
    let good_max = format_score(Tier::GoodToHave.max_score());
    let nice_max = format_score(Tier::NiceToHave.max_score());
    let user = render_template(
        SCORING_PROMPT_TEMPLATE,
        &[
            ("must_max", must_max.as_str()),
            ("good_max", good_max.as_str()),
            ("nice_max", nice_max.as_str()),
            ("criteria_json", criteria_json.as_str()),
            ("candidate_name", candidate_name),
            ("resume_text", resume_text),
        ],
    );

    Ok(Prompt {
        system: format!("{SCORING_SYSTEM}\n{JSON_ONLY_INSTRUCTION}"),
        user,
        temperature: SCORING_TEMPERATURE,
        max_tokens: None,
    })
}

/// Parses a scoring reply into a `ScoreCard` aligned with `criteria`.
pub fn parse_scoring_reply(
    candidate_name: &str,
    reply: &str,
    criteria: &CriteriaSet,
) -> Result<ScoreCard, AppError> {
    let value: Value =
        parse_json_reply(reply).map_err(|e| AppError::from_llm("scoring reply", e))?;

    let scores = value
        .get("scores")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            AppError::ModelMalformedResponse("scoring reply has no 'scores' object".to_string())
        })?;

    let mut card_scores = Vec::with_capacity(criteria.len());
    for (tier, criterion) in criteria.criteria() {
        let raw = tier
            .find_in(scores)
            .and_then(Value::as_object)
            .and_then(|group| lookup_criterion(group, criterion));

        let score = match raw {
            Some(raw) => {
                let parsed = score_value(raw).ok_or_else(|| {
                    AppError::ModelMalformedResponse(format!(
                        "score for '{}: {criterion}' is not a number: {raw}",
                        tier.key()
                    ))
                })?;
                clamp_score(candidate_name, tier, criterion, parsed)
            }
            None => {
                debug!(candidate = %candidate_name, tier = tier.key(), criterion, "No score returned; counting 0");
                0.0
            }
        };
        card_scores.push(CriterionScore::new(tier, criterion, score));
    }

    let card = ScoreCard::new(card_scores);

    if let Some(model_total) = value.get("total_score").and_then(score_value) {
        if (model_total - card.total()).abs() > TOTAL_TOLERANCE {
            warn!(
                candidate = %candidate_name,
                model_total,
                local_total = card.total(),
                "Model total disagrees with sum of scores; using local sum"
            );
        }
    }

    Ok(card)
}

/// Exact name first, then case-insensitive trimmed match.
fn lookup_criterion<'a>(group: &'a Map<String, Value>, criterion: &str) -> Option<&'a Value> {
    group.get(criterion).or_else(|| {
        let wanted = criterion.trim().to_lowercase();
        group
            .iter()
            .find(|(name, _)| name.trim().to_lowercase() == wanted)
            .map(|(_, v)| v)
    })
}

/// Accepts JSON numbers and numeric strings.
fn score_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn clamp_score(candidate_name: &str, tier: Tier, criterion: &str, score: f64) -> f64 {
    let clamped = score.clamp(0.0, tier.max_score());
    if clamped != score {
        warn!(
            candidate = %candidate_name,
            tier = tier.key(),
            criterion,
            score,
            max = tier.max_score(),
            "Score outside tier range; clamped"
        );
    }
    clamped
}

/// Decimal places kept when a score is written out.
const SCORE_DECIMALS: usize = 4;

/// Formats a score with at most four decimals and no trailing zeros, so whole
/// numbers print as `8` and `0.1 + 0.2` prints as `0.3`.
pub fn format_score(score: f64) -> String {
    let text = format!("{:.*}", SCORE_DECIMALS, score);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
