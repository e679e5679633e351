// Resume synthesis pipeline: ranking, enrichment, summary, orchestration.
// All LLM calls go through llm_client — no direct Anthropic calls here.

pub mod cancel;
pub mod enricher;
pub mod generator;
pub mod handlers;
pub mod narration;
pub mod prompts;
pub mod ranking;
pub mod summary;
