//! Project Repository
//!
//! Handles all database operations related to projects.

use sqlx::PgConnection;
use trellis_core::domain::project::Project;
use uuid::Uuid;

/// Insert a project
pub async fn insert(conn: &mut PgConnection, project: &Project) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO projects (id, name, description, created_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(project.id)
    .bind(&project.name)
    .bind(&project.description)
    .bind(project.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Find a project by ID
pub async fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Project>, sqlx::Error> {
    let row = sqlx::query_as::<_, ProjectRow>(
        r#"
        SELECT id, name, description, created_at
        FROM projects
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// List all projects
pub async fn list_all(conn: &mut PgConnection) -> Result<Vec<Project>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ProjectRow>(
        r#"
        SELECT id, name, description, created_at
        FROM projects
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    name: String,
    description: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        }
    }
}
