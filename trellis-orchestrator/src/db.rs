use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id UUID PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pipelines (
            id UUID PRIMARY KEY,
            project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            name VARCHAR(255) NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            last_published_version_id UUID,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pipeline_versions (
            id UUID PRIMARY KEY,
            pipeline_id UUID NOT NULL REFERENCES pipelines(id) ON DELETE CASCADE,
            number INTEGER NOT NULL,
            state VARCHAR(20) NOT NULL,
            metadata JSONB NOT NULL DEFAULT '{}',
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // At most one draft per pipeline
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_pipeline_versions_single_draft
        ON pipeline_versions(pipeline_id)
        WHERE state = 'draft'
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_pipeline_versions_pipeline ON pipeline_versions(pipeline_id, number DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS nodes (
            id UUID PRIMARY KEY,
            seq BIGSERIAL NOT NULL,
            version_id UUID NOT NULL REFERENCES pipeline_versions(id) ON DELETE CASCADE,
            node_key VARCHAR(255) NOT NULL,
            label VARCHAR(255) NOT NULL,
            category VARCHAR(100) NOT NULL,
            node_type VARCHAR(100) NOT NULL,
            status VARCHAR(20) NOT NULL,
            position_x DOUBLE PRECISION NOT NULL DEFAULT 0,
            position_y DOUBLE PRECISION NOT NULL DEFAULT 0,
            config JSONB NOT NULL DEFAULT '{}',
            created_at TIMESTAMPTZ NOT NULL,
            UNIQUE (version_id, node_key)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS edges (
            id UUID PRIMARY KEY,
            seq BIGSERIAL NOT NULL,
            version_id UUID NOT NULL REFERENCES pipeline_versions(id) ON DELETE CASCADE,
            source_node UUID NOT NULL REFERENCES nodes(id) ON DELETE CASCADE,
            target_node UUID NOT NULL REFERENCES nodes(id) ON DELETE CASCADE,
            label VARCHAR(255) NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL,
            CHECK (source_node <> target_node)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_nodes_version ON nodes(version_id, seq)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_edges_version ON edges(version_id, seq)")
        .execute(pool)
        .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
