use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::generation::ranking::ScoringWeights;

/// Upper bound on LLM attempts; backoff doubles per retry.
const MAX_LLM_ATTEMPTS: u32 = 5;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub cache_enabled: bool,
    pub cache_ttl_secs: u64,
    pub cache_timeout_ms: u64,
    pub github_api_url: String,
    pub anthropic_api_key: Option<String>,
    pub llm_enabled: bool,
    pub llm_api_url: String,
    pub llm_max_attempts: u32,
    pub max_projects: usize,
    pub enrichment_concurrency: usize,
    pub generation_timeout_secs: u64,
    pub scoring_weights: ScoringWeights,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: optional_env("REDIS_URL"),
            cache_enabled: parse_env("CACHE_ENABLED", false)?,
            cache_ttl_secs: parse_env("CACHE_TTL_SECS", 3600)?,
            cache_timeout_ms: parse_env("CACHE_TIMEOUT_MS", 2000)?,
            github_api_url: optional_env("GITHUB_API_URL")
                .unwrap_or_else(|| "https://api.github.com".to_string()),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            llm_enabled: parse_env("LLM_ENABLED", false)?,
            llm_api_url: optional_env("LLM_API_URL")
                .unwrap_or_else(|| "https://api.anthropic.com".to_string()),
            llm_max_attempts: parse_env("LLM_MAX_ATTEMPTS", 1)?,
            max_projects: parse_env("RESUME_MAX_PROJECTS", 5)?,
            enrichment_concurrency: parse_env("ENRICHMENT_CONCURRENCY", 3)?,
            generation_timeout_secs: parse_env("GENERATION_TIMEOUT_SECS", 60)?,
            scoring_weights: ScoringWeights::default(),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.cache_enabled && self.redis_url.is_none() {
            bail!("CACHE_ENABLED=true requires REDIS_URL");
        }
        if self.llm_enabled && self.anthropic_api_key.is_none() {
            bail!("LLM_ENABLED=true requires ANTHROPIC_API_KEY");
        }
        if self.llm_max_attempts == 0 || self.llm_max_attempts > MAX_LLM_ATTEMPTS {
            bail!("LLM_MAX_ATTEMPTS must be between 1 and {MAX_LLM_ATTEMPTS}");
        }
        if self.cache_timeout_ms == 0 {
            bail!("CACHE_TIMEOUT_MS must be at least 1");
        }
        if self.enrichment_concurrency == 0 {
            bail!("ENRICHMENT_CONCURRENCY must be at least 1");
        }
        Ok(())
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn base_config() -> Config {
        Config {
            database_url: "postgres://localhost/folio".to_string(),
            redis_url: None,
            cache_enabled: false,
            cache_ttl_secs: 3600,
            cache_timeout_ms: 2000,
            github_api_url: "https://api.github.com".to_string(),
            anthropic_api_key: None,
            llm_enabled: false,
            llm_api_url: "https://api.anthropic.com".to_string(),
            llm_max_attempts: 1,
            max_projects: 5,
            enrichment_concurrency: 3,
            generation_timeout_secs: 60,
            scoring_weights: ScoringWeights::default(),
            port: 8080,
            rust_log: "info".to_string(),
        }
    }

    #[test]
    fn test_parse_value_accepts_bools_and_numbers() {
        assert!(parse_value::<bool>("CACHE_ENABLED", "true").unwrap());
        assert_eq!(parse_value::<u64>("CACHE_TTL_SECS", " 120 ").unwrap(), 120);
    }

    #[test]
    fn test_parse_value_names_the_offending_key() {
        let err = parse_value::<u16>("PORT", "eighty").unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_defaults_pass_validation() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_enabled_cache_requires_redis_url() {
        let mut config = base_config();
        config.cache_enabled = true;
        assert!(config.validate().is_err());

        config.redis_url = Some("redis://127.0.0.1/".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_enabled_llm_requires_api_key() {
        let mut config = base_config();
        config.llm_enabled = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_llm_attempts_are_bounded() {
        let mut config = base_config();
        config.llm_max_attempts = 0;
        assert!(config.validate().is_err());

        config.llm_max_attempts = MAX_LLM_ATTEMPTS;
        assert!(config.validate().is_ok());

        config.llm_max_attempts = 60;
        assert!(config.validate().is_err());
    }
}
