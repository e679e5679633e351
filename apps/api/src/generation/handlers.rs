//! Axum route handler for resume generation.

use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::cancel::CancelSignal;
use crate::models::resume::Resume;
use crate::state::AppState;

/// Request body for resume generation. The GitHub credential travels in the
/// `Authorization: Bearer` header, never in the body.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub user_id: Uuid,
    pub target_role: String,
    /// Skip any cached portfolio for this credential.
    #[serde(default)]
    pub refresh: bool,
}

/// POST /api/v1/resumes/generate
///
/// Full pipeline: fetch → rank → skills → select → enrich → summarize.
/// Persists the result and returns it with 201.
pub async fn handle_generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    let credential = bearer_token(&headers).ok_or(AppError::Unauthorized)?;

    let target_role = request.target_role.trim();
    if target_role.is_empty() {
        return Err(AppError::Validation("target_role cannot be empty".to_string()));
    }

    // Dropping this future (client went away) cancels in-flight enrichment tasks.
    let (handle, cancel) = CancelSignal::manual();
    let _abandon = handle.cancel_on_drop();
    let cancel = cancel.with_timeout(Duration::from_secs(state.config.generation_timeout_secs));

    if request.refresh {
        state.pipeline.invalidate_portfolio(credential, &cancel).await;
    }
    let resume = state
        .pipeline
        .generate(request.user_id, target_role, credential, &cancel)
        .await?;

    state.store.create(&resume).await?;
    info!("Stored resume {} for user {}", resume.id, resume.user_id);

    Ok((StatusCode::CREATED, Json(resume)))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer gho_abc"));
        assert_eq!(bearer_token(&headers), Some("gho_abc"));
    }

    #[test]
    fn test_generate_request_deserialization() {
        let json = serde_json::json!({
            "user_id": Uuid::new_v4(),
            "target_role": "Backend Engineer"
        });
        let request: GenerateRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.target_role, "Backend Engineer");
        assert!(!request.refresh);
    }
}
