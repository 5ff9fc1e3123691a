//! Domain-level error types.

use thiserror::Error;

use crate::domain::PostId;

/// Domain errors - business rule failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No draft is open in the editor")]
    NoActiveDraft,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Repository-level errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    #[error("Post not found: {0}")]
    NotFound(PostId),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(id) => DomainError::NotFound {
                entity_type: "Post",
                id: id.to_string(),
            },
        }
    }
}
