// Shared prompt fragments.
// Each module that calls the model defines its own prompts.rs alongside it.

/// Appended to every system prompt that expects a JSON reply.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
