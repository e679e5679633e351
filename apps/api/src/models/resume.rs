use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// A ranked repository projected into a resume. `position` is the 0-based rank
/// at selection time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeProject {
    pub repo_name: String,
    pub description: String,
    pub url: String,
    pub stars: u32,
    pub language: String,
    pub topics: Vec<String>,
    pub highlights: Vec<String>,
    pub position: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub target_role: String,
    pub summary: String,
    pub projects: Vec<ResumeProject>,
    pub skills: Vec<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row shape of the `resumes` table. Projects live in a JSONB column.
#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub target_role: String,
    pub summary: String,
    pub projects: Json<Vec<ResumeProject>>,
    pub skills: Vec<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ResumeRow> for Resume {
    fn from(row: ResumeRow) -> Self {
        Resume {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            target_role: row.target_role,
            summary: row.summary,
            projects: row.projects.0,
            skills: row.skills,
            is_default: row.is_default,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
