// Criteria extraction: job description document in, three-tier criteria out.

pub mod extractor;
pub mod handlers;
pub mod models;
pub mod prompts;
