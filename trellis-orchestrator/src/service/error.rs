//! Service errors

use thiserror::Error;

use crate::repository::StoreError;

/// Error taxonomy shared by every graph service
#[derive(Debug, Error)]
pub enum GraphError {
    /// The request is malformed; nothing was changed
    #[error("{0}")]
    Validation(String),

    /// A referenced pipeline, project, version, node or edge does not exist
    #[error("{0}")]
    NotFound(String),

    /// The operation is not allowed in the pipeline's current state
    #[error("{0}")]
    FailedPrecondition(String),

    /// The store failed; any in-flight unit of work was rolled back
    #[error(transparent)]
    Storage(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, GraphError>;
