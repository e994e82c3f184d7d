//! Version Repository
//!
//! Handles all database operations related to pipeline versions.

use sqlx::PgConnection;
use sqlx::types::Json;
use trellis_core::domain::version::{PipelineVersion, VersionMetadata, VersionState};
use uuid::Uuid;

use crate::repository::StoreError;

/// Insert a version
pub async fn insert(conn: &mut PgConnection, version: &PipelineVersion) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO pipeline_versions (
            id, pipeline_id, number, state, metadata, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(version.id)
    .bind(version.pipeline_id)
    .bind(version.number)
    .bind(version.state.as_str())
    .bind(Json(&version.metadata))
    .bind(version.created_at)
    .bind(version.updated_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Overwrite number, state and metadata of a version
pub async fn update(conn: &mut PgConnection, version: &PipelineVersion) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE pipeline_versions
        SET number = $1, state = $2, metadata = $3, updated_at = $4
        WHERE id = $5
        "#,
    )
    .bind(version.number)
    .bind(version.state.as_str())
    .bind(Json(&version.metadata))
    .bind(version.updated_at)
    .bind(version.id)
    .execute(conn)
    .await?;

    Ok(())
}

/// Find a version by ID
pub async fn find_by_id(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<VersionRow>, sqlx::Error> {
    sqlx::query_as::<_, VersionRow>(
        r#"
        SELECT id, pipeline_id, number, state, metadata, created_at, updated_at
        FROM pipeline_versions
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await
}

/// Find the highest-numbered version of a pipeline in a given state
pub async fn find_by_state(
    conn: &mut PgConnection,
    pipeline_id: Uuid,
    state: VersionState,
) -> Result<Option<VersionRow>, sqlx::Error> {
    sqlx::query_as::<_, VersionRow>(
        r#"
        SELECT id, pipeline_id, number, state, metadata, created_at, updated_at
        FROM pipeline_versions
        WHERE pipeline_id = $1 AND state = $2
        ORDER BY number DESC
        LIMIT 1
        "#,
    )
    .bind(pipeline_id)
    .bind(state.as_str())
    .fetch_optional(conn)
    .await
}

/// Highest published version number of a pipeline, 0 if it was never published
pub async fn max_published_number(
    conn: &mut PgConnection,
    pipeline_id: Uuid,
) -> Result<i32, sqlx::Error> {
    let max: Option<i32> = sqlx::query_scalar(
        r#"
        SELECT MAX(number)
        FROM pipeline_versions
        WHERE pipeline_id = $1 AND state = 'published'
        "#,
    )
    .bind(pipeline_id)
    .fetch_one(conn)
    .await?;

    Ok(max.unwrap_or(0))
}

/// List every version of a pipeline
pub async fn list_by_pipeline(
    conn: &mut PgConnection,
    pipeline_id: Uuid,
) -> Result<Vec<VersionRow>, sqlx::Error> {
    sqlx::query_as::<_, VersionRow>(
        r#"
        SELECT id, pipeline_id, number, state, metadata, created_at, updated_at
        FROM pipeline_versions
        WHERE pipeline_id = $1
        ORDER BY number DESC, created_at DESC
        "#,
    )
    .bind(pipeline_id)
    .fetch_all(conn)
    .await
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
pub struct VersionRow {
    id: Uuid,
    pipeline_id: Uuid,
    number: i32,
    state: String,
    metadata: Json<VersionMetadata>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<VersionRow> for PipelineVersion {
    type Error = StoreError;

    fn try_from(row: VersionRow) -> Result<Self, Self::Error> {
        let state = row.state.parse::<VersionState>().map_err(StoreError::Corrupt)?;

        Ok(PipelineVersion {
            id: row.id,
            pipeline_id: row.pipeline_id,
            number: row.number,
            state,
            metadata: row.metadata.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
