use std::sync::Arc;

use crate::config::Config;
use crate::generation::generator::ResumePipeline;
use crate::resumes::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Resume persistence. Default: PgResumeStore.
    pub store: Arc<dyn ResumeStore>,
    pub pipeline: Arc<ResumePipeline>,
    pub config: Config,
}
