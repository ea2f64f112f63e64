//! Placement operation errors.

use fitplan_domain::{DomainError, ExerciseId, PlacementId, WorkoutTemplateId};

use crate::infrastructure::ports::RepoError;

/// Errors that can occur during placement operations.
#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("Exercise {0} is not active")]
    ExerciseInactive(ExerciseId),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl PlacementError {
    pub fn template_not_found(id: WorkoutTemplateId) -> Self {
        Self::NotFound(format!("Workout template {id} not found"))
    }

    pub fn exercise_not_found(id: ExerciseId) -> Self {
        Self::NotFound(format!("Exercise {id} not found"))
    }

    pub fn placement_not_found(id: PlacementId) -> Self {
        Self::NotFound(format!("Exercise placement {id} not found in template"))
    }

    pub fn template_not_draft(id: WorkoutTemplateId) -> Self {
        Self::InvalidState(format!(
            "Workout template {id} is not in Draft state and cannot be modified"
        ))
    }

    /// Stable machine-readable code for API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::ExerciseInactive(_) => "EXERCISE_INACTIVE",
            Self::Repo(_) => "REPOSITORY_ERROR",
        }
    }
}

impl From<DomainError> for PlacementError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::Parse(msg) => Self::InvalidInput(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_become_invalid_input() {
        let err: PlacementError = DomainError::validation("Round number must be at least 1").into();
        assert_eq!(err.code(), "INVALID_INPUT");
        assert_eq!(err.to_string(), "Round number must be at least 1");
    }

    #[test]
    fn repo_errors_keep_their_source() {
        let err: PlacementError = RepoError::database("commit", "locked").into();
        assert_eq!(err.code(), "REPOSITORY_ERROR");
        assert!(err.to_string().contains("locked"));
    }
}
