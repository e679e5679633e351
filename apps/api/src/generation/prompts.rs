// Prompt constants for the narration stages.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for the resume summary — free text, no JSON.
pub const SUMMARY_SYSTEM: &str = "You are a professional resume writer. \
    Write concise, impactful summaries. \
    Respond with the summary text only, no preamble, no markdown.";

/// Summary prompt template.
/// Replace: {target_role}, {repo_count}, {skills}, {grounding_instruction}
pub const SUMMARY_PROMPT_TEMPLATE: &str = "Write a professional 2-sentence resume summary \
for a {target_role} role. The candidate has {repo_count} GitHub repositories and skills in: \
{skills}. Be concise and impactful.

{grounding_instruction}";

/// Enrichment prompt template.
/// Replace: {repo_name}, {language}, {topics}, {description}, {grounding_instruction}
pub const ENRICH_PROMPT_TEMPLATE: &str = r#"Rewrite the resume entry for this GitHub project.

Project name: {repo_name}
Primary language: {language}
Topics: {topics}
Current description: {description}

{grounding_instruction}

Return a JSON object with this EXACT schema (no extra fields):
{
  "description": "One sentence describing what the project does and why it matters",
  "highlights": ["First achievement-style bullet", "Second bullet"]
}

HARD RULES:
1. `description` is exactly one sentence
2. `highlights` has 2 or 3 entries
3. No markdown, no code fences"#;
