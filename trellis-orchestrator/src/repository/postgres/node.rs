//! Node Repository
//!
//! Handles all database operations related to graph nodes. Nodes are always
//! addressed together with their version so that an id from another version
//! never matches.

use sqlx::PgConnection;
use trellis_core::domain::node::{Node, NodeCategory, NodeStatus, Position};
use uuid::Uuid;

use crate::repository::StoreError;

const NODE_COLUMNS: &str = "id, version_id, node_key, label, category, node_type, status, \
                            position_x, position_y, config, created_at";

/// Insert a node
pub async fn insert(conn: &mut PgConnection, node: &Node) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO nodes (
            id, version_id, node_key, label, category, node_type, status,
            position_x, position_y, config, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(node.id)
    .bind(node.version_id)
    .bind(&node.key)
    .bind(&node.label)
    .bind(node.category.as_str())
    .bind(&node.node_type)
    .bind(node.status.as_str())
    .bind(node.position.x)
    .bind(node.position.y)
    .bind(&node.config)
    .bind(node.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Update every editable field of a node
pub async fn update(conn: &mut PgConnection, node: &Node) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE nodes
        SET node_key = $1, label = $2, category = $3, node_type = $4, status = $5,
            position_x = $6, position_y = $7, config = $8
        WHERE id = $9 AND version_id = $10
        "#,
    )
    .bind(&node.key)
    .bind(&node.label)
    .bind(node.category.as_str())
    .bind(&node.node_type)
    .bind(node.status.as_str())
    .bind(node.position.x)
    .bind(node.position.y)
    .bind(&node.config)
    .bind(node.id)
    .bind(node.version_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Find a node of a version by ID
pub async fn find_by_id(
    conn: &mut PgConnection,
    version_id: Uuid,
    id: Uuid,
) -> Result<Option<NodeRow>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM nodes WHERE id = $1 AND version_id = $2",
        NODE_COLUMNS
    );

    sqlx::query_as::<_, NodeRow>(&sql)
        .bind(id)
        .bind(version_id)
        .fetch_optional(conn)
        .await
}

/// List the nodes of a version in insertion order
pub async fn list_by_version(
    conn: &mut PgConnection,
    version_id: Uuid,
) -> Result<Vec<NodeRow>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM nodes WHERE version_id = $1 ORDER BY seq ASC",
        NODE_COLUMNS
    );

    sqlx::query_as::<_, NodeRow>(&sql)
        .bind(version_id)
        .fetch_all(conn)
        .await
}

/// Count the nodes of a version
pub async fn count_by_version(conn: &mut PgConnection, version_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM nodes WHERE version_id = $1")
        .bind(version_id)
        .fetch_one(conn)
        .await
}

/// Check whether a key is already taken within a version
pub async fn key_exists(
    conn: &mut PgConnection,
    version_id: Uuid,
    key: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM nodes WHERE version_id = $1 AND node_key = $2)",
    )
    .bind(version_id)
    .bind(key)
    .fetch_one(conn)
    .await
}

/// Delete a node of a version by ID
pub async fn delete(conn: &mut PgConnection, version_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM nodes WHERE id = $1 AND version_id = $2")
        .bind(id)
        .bind(version_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
pub struct NodeRow {
    id: Uuid,
    version_id: Uuid,
    node_key: String,
    label: String,
    category: String,
    node_type: String,
    status: String,
    position_x: f64,
    position_y: f64,
    config: serde_json::Value,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<NodeRow> for Node {
    type Error = StoreError;

    fn try_from(row: NodeRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<NodeStatus>().map_err(StoreError::Corrupt)?;

        Ok(Node {
            id: row.id,
            version_id: row.version_id,
            key: row.node_key,
            label: row.label,
            category: NodeCategory::from(row.category),
            node_type: row.node_type,
            status,
            position: Position {
                x: row.position_x,
                y: row.position_y,
            },
            config: row.config,
            created_at: row.created_at,
        })
    }
}
