// Cross-cutting prompt fragments. Feature prompts live next to the feature
// (see interview/prompts.rs) and append these where needed.

/// Appended to every system prompt whose reply is parsed as JSON.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Joins a feature-specific persona with the JSON-only rules.
pub fn json_system(persona: &str) -> String {
    format!("{persona} {JSON_ONLY_SYSTEM}")
}
