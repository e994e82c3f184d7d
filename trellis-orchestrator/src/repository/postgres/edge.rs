//! Edge Repository
//!
//! Handles all database operations related to graph edges.

use sqlx::PgConnection;
use trellis_core::domain::edge::Edge;
use uuid::Uuid;

/// Insert an edge
pub async fn insert(conn: &mut PgConnection, edge: &Edge) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO edges (id, version_id, source_node, target_node, label, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(edge.id)
    .bind(edge.version_id)
    .bind(edge.source)
    .bind(edge.target)
    .bind(&edge.label)
    .bind(edge.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// List the edges of a version in insertion order
pub async fn list_by_version(
    conn: &mut PgConnection,
    version_id: Uuid,
) -> Result<Vec<Edge>, sqlx::Error> {
    let rows = sqlx::query_as::<_, EdgeRow>(
        r#"
        SELECT id, version_id, source_node, target_node, label, created_at
        FROM edges
        WHERE version_id = $1
        ORDER BY seq ASC
        "#,
    )
    .bind(version_id)
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Delete an edge of a version by ID
pub async fn delete(conn: &mut PgConnection, version_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM edges WHERE id = $1 AND version_id = $2")
        .bind(id)
        .bind(version_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete every edge that starts or ends at a node
pub async fn delete_touching(
    conn: &mut PgConnection,
    version_id: Uuid,
    node_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM edges
        WHERE version_id = $1 AND (source_node = $2 OR target_node = $2)
        "#,
    )
    .bind(version_id)
    .bind(node_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct EdgeRow {
    id: Uuid,
    version_id: Uuid,
    source_node: Uuid,
    target_node: Uuid,
    label: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<EdgeRow> for Edge {
    fn from(row: EdgeRow) -> Self {
        Edge {
            id: row.id,
            version_id: row.version_id,
            source: row.source_node,
            target: row.target_node,
            label: row.label,
            created_at: row.created_at,
        }
    }
}
