//! Repository Ranker — scores, orders, and annotates repositories for selection.
//!
//! Pure computation: the ranking instant is passed in, so the same input ranks
//! identically for the same `now`. Across different instants scores drift down
//! as pushes age; that is expected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::portfolio::Repository;
use crate::models::resume::ResumeProject;

/// The recency term starts at this value for a fresh push...
const RECENCY_CEILING: f64 = 10.0;
/// ...and loses one point per this many days, reaching zero after 300 days.
const RECENCY_DECAY_DAYS: f64 = 30.0;
const POPULAR_STAR_THRESHOLD: u32 = 10;
const ACTIVE_WINDOW_DAYS: f64 = 30.0;
const MAX_TAGGED_TOPICS: usize = 3;

pub const HIGHLIGHT_POPULAR: &str = "Popular project with community engagement";
pub const HIGHLIGHT_ACTIVE: &str = "Actively maintained";

/// Per-signal multipliers of the repository score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Applied to ln(1 + stars).
    pub stars: f64,
    /// Applied to the 0–10 recency term.
    pub recency: f64,
    /// Flat bonus for a detected primary language.
    pub language: f64,
    /// Per topic tag.
    pub topic: f64,
    /// Flat bonus for a non-empty description.
    pub description: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            stars: 3.0,
            recency: 2.5,
            language: 2.0,
            topic: 0.5,
            description: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedRepository {
    pub repository: Repository,
    pub score: f64,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Ranker {
    weights: ScoringWeights,
}

impl Ranker {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Scores every non-fork repository and sorts by descending score.
    /// The sort is stable, so equal scores keep fetch order.
    pub fn rank(&self, repos: &[Repository], now: DateTime<Utc>) -> Vec<RankedRepository> {
        let mut ranked: Vec<RankedRepository> = repos
            .iter()
            .filter(|repo| !repo.is_fork)
            .map(|repo| RankedRepository {
                score: compute_score(repo, now, &self.weights),
                highlights: build_highlights(repo, now),
                repository: repo.clone(),
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        ranked
    }
}

/// score = w.stars·ln(1+stars) + w.recency·max(0, 10 − days/30)
///       + w.language·[language] + w.topic·|topics| + w.description·[description]
pub fn compute_score(repo: &Repository, now: DateTime<Utc>, weights: &ScoringWeights) -> f64 {
    let stars = (repo.stars as f64).ln_1p();
    let recency = match days_since_push(repo, now) {
        Some(days) => (RECENCY_CEILING - days / RECENCY_DECAY_DAYS).max(0.0),
        None => 0.0,
    };
    let language = if repo.language.is_empty() { 0.0 } else { 1.0 };
    let description = if repo.description.is_empty() { 0.0 } else { 1.0 };

    weights.stars * stars
        + weights.recency * recency
        + weights.language * language
        + weights.topic * repo.topics.len() as f64
        + weights.description * description
}

/// Informational highlights, in fixed order. Independent of the score.
pub fn build_highlights(repo: &Repository, now: DateTime<Utc>) -> Vec<String> {
    let mut highlights = Vec::new();

    if repo.stars > POPULAR_STAR_THRESHOLD {
        highlights.push(HIGHLIGHT_POPULAR.to_string());
    }

    if days_since_push(repo, now).is_some_and(|days| days < ACTIVE_WINDOW_DAYS) {
        highlights.push(HIGHLIGHT_ACTIVE.to_string());
    }

    if !repo.topics.is_empty() {
        let tagged: Vec<&str> = repo
            .topics
            .iter()
            .take(MAX_TAGGED_TOPICS)
            .map(String::as_str)
            .collect();
        highlights.push(format!("Tagged: {}", tagged.join(", ")));
    }

    highlights
}

/// Fractional days since the last push, clamped at zero for clock skew.
fn days_since_push(repo: &Repository, now: DateTime<Utc>) -> Option<f64> {
    repo.pushed_at.map(|pushed| {
        let seconds = (now - pushed).num_seconds() as f64;
        (seconds / 86_400.0).max(0.0)
    })
}

/// Takes the first `limit` ranked repositories and projects them into resume
/// projects with positions `0..n`.
pub fn select_top_projects(ranked: &[RankedRepository], limit: usize) -> Vec<ResumeProject> {
    ranked
        .iter()
        .take(limit)
        .enumerate()
        .map(|(position, r)| ResumeProject {
            repo_name: r.repository.name.clone(),
            description: r.repository.description.clone(),
            url: r.repository.url.clone(),
            stars: r.repository.stars,
            language: r.repository.language.clone(),
            topics: r.repository.topics.clone(),
            highlights: r.highlights.clone(),
            position,
        })
        .collect()
}
