// Shared prompt fragments. Each pipeline stage that calls the LLM defines its
// own prompts alongside it in generation/prompts.rs.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every narration prompt.
pub const GROUNDING_INSTRUCTION: &str = "\
    Use only the facts given below. Do NOT invent metrics, employers, users, \
    or technologies that are not listed.";
