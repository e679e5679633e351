//! Ownership-checked resume operations on top of `ResumeStore`.
//!
//! A caller touching someone else's resume gets `Forbidden`, never a silent
//! no-op. A missing resume is `NotFound`.

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{Resume, ResumeProject};
use crate::resumes::store::ResumeStore;

/// Fields a user may edit after generation. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResumeUpdate {
    pub title: Option<String>,
    pub target_role: Option<String>,
    pub summary: Option<String>,
    pub projects: Option<Vec<ResumeProject>>,
    pub skills: Option<Vec<String>>,
}

pub async fn get_resume(
    store: &dyn ResumeStore,
    resume_id: Uuid,
    user_id: Uuid,
) -> Result<Resume, AppError> {
    let resume = store
        .get(resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    if resume.user_id != user_id {
        return Err(AppError::Forbidden);
    }
    Ok(resume)
}

pub async fn list_resumes(store: &dyn ResumeStore, user_id: Uuid) -> Result<Vec<Resume>, AppError> {
    Ok(store.list_by_user(user_id).await?)
}

pub async fn update_resume(
    store: &dyn ResumeStore,
    resume_id: Uuid,
    user_id: Uuid,
    update: ResumeUpdate,
) -> Result<Resume, AppError> {
    let mut resume = get_resume(store, resume_id, user_id).await?;

    if let Some(title) = update.title {
        resume.title = title;
    }
    if let Some(target_role) = update.target_role {
        resume.target_role = target_role;
    }
    if let Some(summary) = update.summary {
        resume.summary = summary;
    }
    if let Some(mut projects) = update.projects {
        // keep positions contiguous in the order supplied
        for (position, project) in projects.iter_mut().enumerate() {
            project.position = position;
        }
        resume.projects = projects;
    }
    if let Some(skills) = update.skills {
        resume.skills = dedup_preserving_order(skills);
    }
    resume.updated_at = Utc::now();

    store.update(&resume).await?;
    Ok(resume)
}

pub async fn delete_resume(
    store: &dyn ResumeStore,
    resume_id: Uuid,
    user_id: Uuid,
) -> Result<(), AppError> {
    get_resume(store, resume_id, user_id).await?;
    Ok(store.delete(resume_id).await?)
}

fn dedup_preserving_order(skills: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    skills
        .into_iter()
        .filter(|s| seen.insert(s.clone()))
        .collect()
}
