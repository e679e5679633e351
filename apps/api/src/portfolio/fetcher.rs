//! Portfolio Fetcher — cache-first retrieval of a GitHub profile and repositories.
//!
//! Cache failures are never fatal: a failed, slow or undecodable read counts as a
//! miss and a failed or slow write is logged and dropped. Every cache call is
//! bounded by `cache_timeout` and the caller's `CancelSignal`. GitHub failures
//! propagate unchanged.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::generation::cancel::{CancelSignal, Cancelled};
use crate::models::portfolio::{PortfolioSnapshot, Profile, Repository};
use crate::portfolio::cache::{portfolio_key, CacheError, PortfolioCache};
use crate::portfolio::github::{GitHubClient, GitHubError};

pub const DEFAULT_CACHE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Upstream(#[from] GitHubError),

    #[error("Portfolio fetch cancelled")]
    Cancelled,
}

impl From<Cancelled> for FetchError {
    fn from(_: Cancelled) -> Self {
        FetchError::Cancelled
    }
}

#[derive(Clone)]
pub struct PortfolioFetcher {
    github: GitHubClient,
    cache: Arc<dyn PortfolioCache>,
    ttl: Duration,
    cache_timeout: Duration,
}

impl PortfolioFetcher {
    pub fn new(github: GitHubClient, cache: Arc<dyn PortfolioCache>, ttl: Duration) -> Self {
        Self {
            github,
            cache,
            ttl,
            cache_timeout: DEFAULT_CACHE_TIMEOUT,
        }
    }

    /// Caps how long any single cache operation may take.
    pub fn with_cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache_timeout = timeout;
        self
    }

    pub async fn fetch(
        &self,
        credential: &str,
        cancel: &CancelSignal,
    ) -> Result<(Profile, Vec<Repository>), FetchError> {
        let key = portfolio_key(credential);

        if let Some(snapshot) = self.read_cached(&key, cancel).await {
            debug!("Portfolio cache hit for {}", key);
            return Ok((snapshot.profile, snapshot.repositories));
        }

        let profile = cancel.run(self.github.get_profile(credential)).await??;
        let repositories = cancel.run(self.github.get_repositories(credential)).await??;
        info!(
            "Fetched {} repositories for GitHub user {}",
            repositories.len(),
            profile.login
        );

        let snapshot = PortfolioSnapshot {
            profile,
            repositories,
        };
        self.write_cached(&key, &snapshot, cancel).await;

        Ok((snapshot.profile, snapshot.repositories))
    }

    /// Drops the cached snapshot so the next fetch goes to GitHub.
    pub async fn invalidate(&self, credential: &str, cancel: &CancelSignal) {
        let key = portfolio_key(credential);
        self.bounded("delete", &key, cancel, self.cache.delete(&key))
            .await;
    }

    async fn read_cached(&self, key: &str, cancel: &CancelSignal) -> Option<PortfolioSnapshot> {
        let raw = self
            .bounded("read", key, cancel, self.cache.get(key))
            .await
            .flatten()?;

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Discarding undecodable portfolio cache entry {}: {}", key, e);
                None
            }
        }
    }

    async fn write_cached(&self, key: &str, snapshot: &PortfolioSnapshot, cancel: &CancelSignal) {
        let raw = match serde_json::to_string(snapshot) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to serialize portfolio snapshot: {}", e);
                return;
            }
        };

        self.bounded("write", key, cancel, self.cache.put(key, &raw, self.ttl))
            .await;
    }

    /// Runs one cache operation under the cache timeout and `cancel`.
    /// Any failure is logged and reported as `None`.
    async fn bounded<T, F>(&self, op: &str, key: &str, cancel: &CancelSignal, call: F) -> Option<T>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        match cancel.run(tokio::time::timeout(self.cache_timeout, call)).await {
            Ok(Ok(Ok(value))) => Some(value),
            Ok(Ok(Err(e))) => {
                warn!("Portfolio cache {} failed for {}: {}", op, key, e);
                None
            }
            Ok(Err(_)) => {
                warn!(
                    "Portfolio cache {} for {} exceeded {:?}, skipping",
                    op, key, self.cache_timeout
                );
                None
            }
            Err(Cancelled) => {
                warn!("Portfolio cache {} for {} abandoned: request cancelled", op, key);
                None
            }
        }
    }
}
