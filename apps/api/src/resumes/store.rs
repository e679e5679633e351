use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::resume::{Resume, ResumeRow};

/// Persistence collaborator for generated resumes. Plain CRUD; ownership
/// checks live in `resumes::service`.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn create(&self, resume: &Resume) -> Result<(), sqlx::Error>;
    async fn get(&self, id: Uuid) -> Result<Option<Resume>, sqlx::Error>;
    /// Newest first.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Resume>, sqlx::Error>;
    async fn update(&self, resume: &Resume) -> Result<(), sqlx::Error>;
    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error>;
}

pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn create(&self, resume: &Resume) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO resumes
                (id, user_id, title, target_role, summary, projects, skills, is_default, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(resume.id)
        .bind(resume.user_id)
        .bind(&resume.title)
        .bind(&resume.target_role)
        .bind(&resume.summary)
        .bind(Json(&resume.projects))
        .bind(&resume.skills)
        .bind(resume.is_default)
        .bind(resume.created_at)
        .bind(resume.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Resume>, sqlx::Error> {
        let row = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Resume::from))
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Resume>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Resume::from).collect())
    }

    async fn update(&self, resume: &Resume) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE resumes
            SET title = $2, target_role = $3, summary = $4, projects = $5,
                skills = $6, is_default = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(resume.id)
        .bind(&resume.title)
        .bind(&resume.target_role)
        .bind(&resume.summary)
        .bind(Json(&resume.projects))
        .bind(&resume.skills)
        .bind(resume.is_default)
        .bind(resume.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
