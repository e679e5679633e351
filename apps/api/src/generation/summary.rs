//! Summary Composer — the resume's narrative paragraph.

use std::sync::Arc;

use crate::generation::cancel::CancelSignal;
use crate::generation::narration::{attempt_or_fallback, Narrated};
use crate::generation::prompts::{SUMMARY_PROMPT_TEMPLATE, SUMMARY_SYSTEM};
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::TextGenerator;

/// Skills named in the summary, in extraction order.
const SUMMARY_SKILL_LIMIT: usize = 5;
const NO_SKILLS_PHRASE: &str = "various technologies";

#[derive(Clone)]
pub struct SummaryComposer {
    generator: Arc<dyn TextGenerator>,
}

impl SummaryComposer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// LLM summary, or the deterministic template when the backend is disabled,
    /// errors, returns nothing, or `cancel` fires.
    pub async fn compose(
        &self,
        target_role: &str,
        repo_count: usize,
        skills: &[String],
        cancel: &CancelSignal,
    ) -> Narrated<String> {
        let prompt = build_summary_prompt(target_role, repo_count, skills);
        attempt_or_fallback(
            "Summary generation",
            cancel,
            self.generator.complete(&prompt, SUMMARY_SYSTEM),
            || fallback_summary(target_role, repo_count, skills),
        )
        .await
    }
}

/// The template summary. Pure: identical inputs give identical output.
pub fn fallback_summary(target_role: &str, repo_count: usize, skills: &[String]) -> String {
    format!(
        "Software engineer with {repo_count} public repositories. Experienced in {}. Seeking {target_role} role.",
        format_skills(skills)
    )
}

fn format_skills(skills: &[String]) -> String {
    if skills.is_empty() {
        return NO_SKILLS_PHRASE.to_string();
    }
    skills
        .iter()
        .take(SUMMARY_SKILL_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn build_summary_prompt(target_role: &str, repo_count: usize, skills: &[String]) -> String {
    SUMMARY_PROMPT_TEMPLATE
        .replace("{target_role}", target_role)
        .replace("{repo_count}", &repo_count.to_string())
        .replace("{skills}", &format_skills(skills))
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
}
