//! Pipeline Repository
//!
//! Handles all database operations related to pipelines.

use sqlx::PgConnection;
use trellis_core::domain::pipeline::Pipeline;
use uuid::Uuid;

/// Insert a pipeline
pub async fn insert(conn: &mut PgConnection, pipeline: &Pipeline) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO pipelines (
            id, project_id, name, description, last_published_version_id, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(pipeline.id)
    .bind(pipeline.project_id)
    .bind(&pipeline.name)
    .bind(&pipeline.description)
    .bind(pipeline.last_published_version_id)
    .bind(pipeline.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Find a pipeline by ID
pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Pipeline>, sqlx::Error> {
    let row = sqlx::query_as::<_, PipelineRow>(
        r#"
        SELECT id, project_id, name, description, last_published_version_id, created_at
        FROM pipelines
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// Find a pipeline by ID and hold a row lock on it until the transaction ends
pub async fn lock_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Pipeline>, sqlx::Error> {
    let row = sqlx::query_as::<_, PipelineRow>(
        r#"
        SELECT id, project_id, name, description, last_published_version_id, created_at
        FROM pipelines
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// List the pipelines of a project
pub async fn list_by_project(
    conn: &mut PgConnection,
    project_id: Uuid,
) -> Result<Vec<Pipeline>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PipelineRow>(
        r#"
        SELECT id, project_id, name, description, last_published_version_id, created_at
        FROM pipelines
        WHERE project_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(project_id)
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Point a pipeline at its latest published version
pub async fn set_published_version(
    conn: &mut PgConnection,
    pipeline_id: Uuid,
    version_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE pipelines SET last_published_version_id = $1 WHERE id = $2")
        .bind(version_id)
        .bind(pipeline_id)
        .execute(conn)
        .await?;

    Ok(())
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct PipelineRow {
    id: Uuid,
    project_id: Uuid,
    name: String,
    description: String,
    last_published_version_id: Option<Uuid>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<PipelineRow> for Pipeline {
    fn from(row: PipelineRow) -> Self {
        Pipeline {
            id: row.id,
            project_id: row.project_id,
            name: row.name,
            description: row.description,
            last_published_version_id: row.last_published_version_id,
            created_at: row.created_at,
        }
    }
}
