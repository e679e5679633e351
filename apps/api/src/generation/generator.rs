//! Resume Generation — orchestrates the full synthesis pipeline.
//!
//! Flow: fetch portfolio → rank → extract skills → select top N →
//!       enrich each project (concurrent, best effort) → compose summary →
//!       assemble `Resume`.
//!
//! Only the fetch can fail the request. Enrichment and summary failures are
//! absorbed by their fallbacks.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Semaphore;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::cancel::CancelSignal;
use crate::generation::enricher::Enricher;
use crate::generation::narration::NarrationSource;
use crate::generation::ranking::{select_top_projects, Ranker};
use crate::generation::summary::SummaryComposer;
use crate::models::resume::{Resume, ResumeProject};
use crate::portfolio::fetcher::{FetchError, PortfolioFetcher};
use crate::portfolio::skills::extract_skills;

pub const RESUME_TITLE: &str = "GitHub Resume";
pub const DEFAULT_MAX_PROJECTS: usize = 5;
pub const DEFAULT_ENRICHMENT_CONCURRENCY: usize = 3;

#[derive(Clone)]
pub struct ResumePipeline {
    fetcher: PortfolioFetcher,
    ranker: Ranker,
    enricher: Enricher,
    composer: SummaryComposer,
    max_projects: usize,
    enrichment_concurrency: usize,
}

impl ResumePipeline {
    pub fn new(
        fetcher: PortfolioFetcher,
        ranker: Ranker,
        enricher: Enricher,
        composer: SummaryComposer,
    ) -> Self {
        Self {
            fetcher,
            ranker,
            enricher,
            composer,
            max_projects: DEFAULT_MAX_PROJECTS,
            enrichment_concurrency: DEFAULT_ENRICHMENT_CONCURRENCY,
        }
    }

    pub fn with_max_projects(mut self, max_projects: usize) -> Self {
        self.max_projects = max_projects;
        self
    }

    pub fn with_enrichment_concurrency(mut self, limit: usize) -> Self {
        self.enrichment_concurrency = limit.max(1);
        self
    }

    /// Drops the cached portfolio for `credential` so the next run refetches.
    pub async fn invalidate_portfolio(&self, credential: &str, cancel: &CancelSignal) {
        self.fetcher.invalidate(credential, cancel).await;
    }

    /// Runs the pipeline for one request. The returned resume is not persisted.
    pub async fn generate(
        &self,
        user_id: Uuid,
        target_role: &str,
        credential: &str,
        cancel: &CancelSignal,
    ) -> Result<Resume, AppError> {
        // Step 1: Fetch portfolio (cache first)
        let (profile, repos) = self
            .fetcher
            .fetch(credential, cancel)
            .await
            .map_err(|e| match e {
                FetchError::Upstream(e) => AppError::Upstream(e),
                FetchError::Cancelled => AppError::Cancelled,
            })?;
        info!(
            "Generating resume for user {} from {} repositories of {}",
            user_id,
            repos.len(),
            profile.login
        );

        // Step 2: Rank against the current instant
        let ranked = self.ranker.rank(&repos, Utc::now());

        // Step 3: Skills over everything fetched
        let skills = extract_skills(&repos);

        // Step 4: Select top N
        let selected = select_top_projects(&ranked, self.max_projects);
        info!(
            "Selected {} of {} ranked repositories",
            selected.len(),
            ranked.len()
        );

        // Step 5: Enrich (falls back per project)
        let projects = self.enrich_all(selected, cancel).await;

        // Step 6: Summary (falls back to template)
        let summary = self
            .composer
            .compose(target_role, repos.len(), &skills, cancel)
            .await;

        let now = Utc::now();
        Ok(Resume {
            id: Uuid::new_v4(),
            user_id,
            title: RESUME_TITLE.to_string(),
            target_role: target_role.to_string(),
            summary: summary.value,
            projects,
            skills,
            is_default: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Enriches every project on its own task, at most `enrichment_concurrency`
    /// at a time. Output order and positions match the input.
    async fn enrich_all(
        &self,
        selected: Vec<ResumeProject>,
        cancel: &CancelSignal,
    ) -> Vec<ResumeProject> {
        let permits = Arc::new(Semaphore::new(self.enrichment_concurrency));

        let handles: Vec<_> = selected
            .iter()
            .cloned()
            .map(|project| {
                let enricher = self.enricher.clone();
                let cancel = cancel.clone();
                let permits = permits.clone();
                tokio::spawn(async move {
                    let _permit = permits.acquire_owned().await.ok();
                    enricher.enrich_project(project, &cancel).await
                })
            })
            .collect();

        let mut projects = Vec::with_capacity(selected.len());
        let mut enriched = 0usize;
        for (handle, original) in handles.into_iter().zip(selected) {
            match handle.await {
                Ok(outcome) => {
                    if outcome.source == NarrationSource::Generated {
                        enriched += 1;
                    }
                    projects.push(outcome.value);
                }
                Err(e) => {
                    warn!("Enrichment task for {} aborted: {}", original.repo_name, e);
                    projects.push(original);
                }
            }
        }

        info!("Enriched {}/{} projects", enriched, projects.len());
        projects
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
