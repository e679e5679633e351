//! Project Enricher — optional LLM rewrite of a project's description and highlights.
//!
//! Best effort only. `enrich` either returns a complete, well-formed rewrite or
//! fails; `enrich_project` turns any failure into the unchanged ranker output.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::generation::cancel::CancelSignal;
use crate::generation::narration::{attempt_or_fallback, Narrated};
use crate::generation::prompts::ENRICH_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{complete_json, LlmError, TextGenerator};
use crate::models::resume::ResumeProject;

/// Strict reply shape expected from the LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Enrichment {
    pub description: String,
    pub highlights: Vec<String>,
}

#[derive(Clone)]
pub struct Enricher {
    generator: Arc<dyn TextGenerator>,
}

impl Enricher {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn enrich(
        &self,
        repo_name: &str,
        description: &str,
        language: &str,
        topics: &[String],
    ) -> Result<Enrichment, LlmError> {
        let prompt = build_enrich_prompt(repo_name, description, language, topics);
        let enrichment: Enrichment =
            complete_json(self.generator.as_ref(), &prompt, JSON_ONLY_SYSTEM).await?;
        validate(enrichment)
    }

    /// Returns `project` with enriched text, or untouched if enrichment fails.
    pub async fn enrich_project(
        &self,
        mut project: ResumeProject,
        cancel: &CancelSignal,
    ) -> Narrated<ResumeProject> {
        let original = Enrichment {
            description: project.description.clone(),
            highlights: project.highlights.clone(),
        };

        let outcome = attempt_or_fallback(
            &format!("Enrichment of {}", project.repo_name),
            cancel,
            self.enrich(
                &project.repo_name,
                &project.description,
                &project.language,
                &project.topics,
            ),
            || original,
        )
        .await;

        project.description = outcome.value.description;
        project.highlights = outcome.value.highlights;
        Narrated {
            value: project,
            source: outcome.source,
        }
    }
}

/// Rejects replies that parsed but carry nothing usable.
fn validate(enrichment: Enrichment) -> Result<Enrichment, LlmError> {
    if enrichment.description.trim().is_empty() {
        return Err(LlmError::Shape("empty description".to_string()));
    }
    let highlights: Vec<String> = enrichment
        .highlights
        .into_iter()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .collect();
    if highlights.is_empty() {
        return Err(LlmError::Shape("no highlights".to_string()));
    }
    Ok(Enrichment {
        description: enrichment.description.trim().to_string(),
        highlights,
    })
}

fn build_enrich_prompt(
    repo_name: &str,
    description: &str,
    language: &str,
    topics: &[String],
) -> String {
    let or_none = |s: &str| if s.is_empty() { "(none)".to_string() } else { s.to_string() };
    ENRICH_PROMPT_TEMPLATE
        .replace("{repo_name}", repo_name)
        .replace("{language}", &or_none(language))
        .replace("{topics}", &or_none(&topics.join(", ")))
        .replace("{description}", &or_none(description))
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
}
