//! Repository port traits for database access.

use async_trait::async_trait;
use fitplan_domain::{
    Exercise, ExerciseId, ExerciseLink, ExerciseLinkType, PlacementGroup, PlacementId,
    TemplateExercisePlacement, WorkoutPhase, WorkoutTemplate, WorkoutTemplateId,
};

use super::error::RepoError;

// =============================================================================
// Reference Data (owned by other services, read-only here)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkoutTemplateRepo: Send + Sync {
    async fn get(&self, id: WorkoutTemplateId) -> Result<Option<WorkoutTemplate>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExerciseRepo: Send + Sync {
    async fn get(&self, id: ExerciseId) -> Result<Option<Exercise>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExerciseLinkRepo: Send + Sync {
    /// Active links of one type sourced from `exercise_id`, `display_order` ascending.
    async fn links_by_source(
        &self,
        exercise_id: ExerciseId,
        link_type: ExerciseLinkType,
    ) -> Result<Vec<ExerciseLink>, RepoError>;
}

// =============================================================================
// Placement Storage (unit of work)
// =============================================================================

/// Opens read-only and writable scopes over template exercise placements.
///
/// Every change made through a [`PlacementWriteScope`] becomes visible to
/// other scopes only when `commit` succeeds. Dropping a write scope without
/// committing discards its changes.
#[async_trait]
pub trait PlacementStore: Send + Sync {
    async fn read_only(&self) -> Result<Box<dyn PlacementReadScope>, RepoError>;
    async fn writable(&self) -> Result<Box<dyn PlacementWriteScope>, RepoError>;
}

/// Placement queries. Lists are sorted by phase, round, then `order_in_round`.
#[async_trait]
pub trait PlacementReadScope: Send {
    async fn get_by_template(
        &mut self,
        template_id: WorkoutTemplateId,
    ) -> Result<Vec<TemplateExercisePlacement>, RepoError>;

    async fn get_by_phase(
        &mut self,
        template_id: WorkoutTemplateId,
        phase: WorkoutPhase,
    ) -> Result<Vec<TemplateExercisePlacement>, RepoError>;

    async fn get_by_round(
        &mut self,
        group: PlacementGroup,
    ) -> Result<Vec<TemplateExercisePlacement>, RepoError>;

    /// `None` when the group is empty.
    async fn get_max_order_in_round(
        &mut self,
        group: PlacementGroup,
    ) -> Result<Option<u32>, RepoError>;

    async fn get_by_id(
        &mut self,
        id: PlacementId,
    ) -> Result<Option<TemplateExercisePlacement>, RepoError>;
}

#[async_trait]
pub trait PlacementWriteScope: PlacementReadScope {
    async fn add(&mut self, placement: &TemplateExercisePlacement) -> Result<(), RepoError>;

    /// Fails with `NotFound` if the placement does not exist.
    async fn update(&mut self, placement: &TemplateExercisePlacement) -> Result<(), RepoError>;

    /// Deletes every listed placement or fails; a missing id is `NotFound`.
    async fn delete_batch(&mut self, ids: &[PlacementId]) -> Result<(), RepoError>;

    async fn commit(self: Box<Self>) -> Result<(), RepoError>;
}
