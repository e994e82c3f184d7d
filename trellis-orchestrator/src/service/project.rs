//! Project Service
//!
//! Business logic for project management.

use trellis_core::domain::project::Project;
use trellis_core::dto::project::CreateProject;
use uuid::Uuid;

use crate::repository::GraphStore;
use crate::service::{GraphError, Result};

/// Create a new project
pub async fn create_project(store: &dyn GraphStore, req: CreateProject) -> Result<Project> {
    validate_project_request(&req)?;

    let project = Project {
        id: Uuid::new_v4(),
        name: req.name.trim().to_string(),
        description: req.description.trim().to_string(),
        created_at: chrono::Utc::now(),
    };

    let mut uow = store.begin().await?;
    uow.insert_project(&project).await?;
    uow.commit().await?;

    tracing::info!("Project created: {} ({})", project.name, project.id);

    Ok(project)
}

/// List all projects, newest first
pub async fn list_projects(store: &dyn GraphStore) -> Result<Vec<Project>> {
    let mut uow = store.begin().await?;
    let projects = uow.list_projects().await?;
    Ok(projects)
}

// =============================================================================
// Validation
// =============================================================================

fn validate_project_request(req: &CreateProject) -> Result<()> {
    if req.name.trim().is_empty() {
        return Err(GraphError::Validation(
            "Project name cannot be empty".to_string(),
        ));
    }

    if req.name.len() > 255 {
        return Err(GraphError::Validation(
            "Project name is too long (max 255 characters)".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryGraphStore;

    #[test]
    fn test_validate_empty_name() {
        let req = CreateProject {
            name: "  ".to_string(),
            description: String::new(),
        };

        let result = validate_project_request(&req);
        assert!(matches!(result, Err(GraphError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let store = InMemoryGraphStore::new();
        let created = create_project(
            &store,
            CreateProject {
                name: " Research ".to_string(),
                description: "Agents".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(created.name, "Research");

        let projects = list_projects(&store).await.unwrap();
        assert_eq!(projects, vec![created]);
    }
}
