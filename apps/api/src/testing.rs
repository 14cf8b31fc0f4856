//! Deterministic collaborators for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::documents::{Document, TextExtractor};
use crate::errors::AppError;
use crate::llm_client::{CompletionOracle, LlmError, Prompt};

#[derive(Debug, Clone)]
pub enum Script {
    Reply(String),
    Delayed(Duration, String),
    Unavailable,
}

impl Script {
    pub fn reply(text: &str) -> Self {
        Script::Reply(text.to_string())
    }
}

/// Oracle that answers by candidate name, read from the `Candidate Name:`
/// line of the prompt. Prompts without one use the fallback script.
#[derive(Default)]
pub struct ScriptedOracle {
    scripts: HashMap<String, Script>,
    fallback: Option<Script>,
    calls: AtomicUsize,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, candidate: &str, script: Script) -> Self {
        self.scripts.insert(candidate.to_string(), script);
        self
    }

    pub fn otherwise(mut self, script: Script) -> Self {
        self.fallback = Some(script);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionOracle for ScriptedOracle {
    async fn complete(&self, prompt: &Prompt) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let candidate = prompt
            .user
            .lines()
            .find_map(|line| line.strip_prefix("Candidate Name: "))
            .unwrap_or_default();

        let script = self
            .scripts
            .get(candidate)
            .or(self.fallback.as_ref())
            .cloned()
            .unwrap_or(Script::Unavailable);

        match script {
            Script::Reply(text) => Ok(text),
            Script::Delayed(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            Script::Unavailable => Err(LlmError::Api {
                status: 503,
                message: "scripted outage".to_string(),
            }),
        }
    }
}

/// Reads document bytes as UTF-8. Format detection still applies.
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, document: &Document) -> Result<String, AppError> {
        document.format()?;
        String::from_utf8(document.bytes.to_vec())
            .map_err(|_| AppError::ExtractionFailed(format!("{}: not UTF-8", document.filename)))
    }
}
