use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the `resumes` table if it does not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS resumes (
            id          UUID PRIMARY KEY,
            user_id     UUID NOT NULL,
            title       TEXT NOT NULL,
            target_role TEXT NOT NULL,
            summary     TEXT NOT NULL,
            projects    JSONB NOT NULL DEFAULT '[]',
            skills      TEXT[] NOT NULL DEFAULT '{}',
            is_default  BOOLEAN NOT NULL DEFAULT FALSE,
            created_at  TIMESTAMPTZ NOT NULL,
            updated_at  TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS resumes_user_id_idx ON resumes (user_id, created_at DESC)")
        .execute(pool)
        .await?;

    info!("Database schema ready");
    Ok(())
}
