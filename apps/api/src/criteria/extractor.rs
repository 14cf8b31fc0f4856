//! Criteria extraction: job description document in, `CriteriaSet` out.

use std::time::Duration;

use serde_json::Value;
use tracing::{error, info};

use crate::criteria::models::{CriteriaSet, Tier};
use crate::criteria::prompts::{
    CRITERIA_EXTRACTION_PROMPT, CRITERIA_EXTRACTION_SYSTEM, CRITERIA_MAX_TOKENS,
    CRITERIA_TEMPERATURE,
};
use crate::documents::{ensure_text, Document, TextExtractor};
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{
    complete_within, parse_json_reply, render_template, strip_json_fences, CompletionOracle,
    Prompt,
};

/// Extracts ranking criteria from a job description document.
pub async fn extract_criteria(
    document: &Document,
    extractor: &dyn TextExtractor,
    oracle: &dyn CompletionOracle,
    timeout: Duration,
) -> Result<CriteriaSet, AppError> {
    document.format()?;
    let job_text = ensure_text(&document.filename, extractor.extract(document).await?)?;

    let prompt = build_extraction_prompt(&job_text);
    let reply = complete_within(oracle, &prompt, timeout)
        .await
        .map_err(|e| AppError::from_llm(&format!("criteria extraction for {}", document.filename), e))?;

    let criteria = parse_criteria_reply(&reply).map_err(|e| {
        error!(document = %document.filename, reply = %reply, "Unusable criteria reply");
        e
    })?;

    info!(
        document = %document.filename,
        must_have = criteria.must_have.len(),
        good_to_have = criteria.good_to_have.len(),
        nice_to_have = criteria.nice_to_have.len(),
        "Extracted criteria"
    );
    Ok(criteria)
}

pub fn build_extraction_prompt(job_text: &str) -> Prompt {
    Prompt {
        system: format!("{CRITERIA_EXTRACTION_SYSTEM}\n{JSON_ONLY_INSTRUCTION}"),
        user: render_template(CRITERIA_EXTRACTION_PROMPT, &[("job_text", job_text)]),
        temperature: CRITERIA_TEMPERATURE,
        max_tokens: Some(CRITERIA_MAX_TOKENS),
    }
}

/// Parses the model's criteria reply. Python-style literals (`True`, `False`,
/// `None`) are rewritten once if strict parsing fails.
pub fn parse_criteria_reply(reply: &str) -> Result<CriteriaSet, AppError> {
    let value: Value = match parse_json_reply(reply) {
        Ok(v) => v,
        Err(first) => parse_json_reply(&normalize_python_literals(strip_json_fences(reply)))
            .map_err(|_| AppError::from_llm("criteria reply", first))?,
    };

    let object = value.as_object().ok_or_else(|| {
        AppError::ModelMalformedResponse("criteria reply is not a JSON object".to_string())
    })?;

    for tier in Tier::ALL {
        match tier.find_in(object) {
            Some(Value::Object(_)) => {}
            Some(_) => {
                return Err(AppError::ModelMalformedResponse(format!(
                    "criteria reply has a non-object '{}' group",
                    tier.key()
                )))
            }
            None => {
                return Err(AppError::ModelMalformedResponse(format!(
                    "criteria reply is missing the '{}' group",
                    tier.key()
                )))
            }
        }
    }

    serde_json::from_value(value)
        .map_err(|e| AppError::ModelMalformedResponse(format!("criteria reply: {e}")))
}

/// Rewrites bare `True`/`False`/`None` tokens outside string literals.
fn normalize_python_literals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            rest = &rest[c.len_utf8()..];
            continue;
        }

        if c == '"' {
            in_string = true;
        }

        let replaced = [("True", "true"), ("False", "false"), ("None", "null")]
            .into_iter()
            .find(|(py, _)| rest.starts_with(py));
        match replaced {
            Some((py, json)) => {
                out.push_str(json);
                rest = &rest[py.len()..];
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}
