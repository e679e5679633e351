//! Axum route handlers for stored resumes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::Resume;
use crate::resumes::service::{self, ResumeUpdate};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CallerQuery {
    pub user_id: Uuid,
}

/// GET /api/v1/resumes?user_id=
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(caller): Query<CallerQuery>,
) -> Result<Json<Vec<Resume>>, AppError> {
    let resumes = service::list_resumes(state.store.as_ref(), caller.user_id).await?;
    Ok(Json(resumes))
}

/// GET /api/v1/resumes/:id?user_id=
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(caller): Query<CallerQuery>,
) -> Result<Json<Resume>, AppError> {
    let resume = service::get_resume(state.store.as_ref(), resume_id, caller.user_id).await?;
    Ok(Json(resume))
}

/// PUT /api/v1/resumes/:id?user_id=
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(caller): Query<CallerQuery>,
    Json(update): Json<ResumeUpdate>,
) -> Result<Json<Resume>, AppError> {
    if update.target_role.as_deref().is_some_and(|r| r.trim().is_empty()) {
        return Err(AppError::Validation("target_role cannot be empty".to_string()));
    }
    let resume =
        service::update_resume(state.store.as_ref(), resume_id, caller.user_id, update).await?;
    Ok(Json(resume))
}

/// DELETE /api/v1/resumes/:id?user_id=
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(caller): Query<CallerQuery>,
) -> Result<StatusCode, AppError> {
    service::delete_resume(state.store.as_ref(), resume_id, caller.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
