use std::sync::Arc;

use crate::config::Config;
use crate::documents::TextExtractor;
use crate::llm_client::CompletionOracle;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Model backend. Default: `LlmClient`; tests inject a scripted oracle.
    pub oracle: Arc<dyn CompletionOracle>,
    /// Document text extraction. Default: `FileTextExtractor`.
    pub extractor: Arc<dyn TextExtractor>,
}
