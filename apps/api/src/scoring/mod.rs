// Resume scoring: criteria + resume documents in, CSV table out.
// All model calls go through llm_client::CompletionOracle.

pub mod handlers;
pub mod models;
pub mod prompts;
pub mod reply;
pub mod report;
pub mod scorer;
