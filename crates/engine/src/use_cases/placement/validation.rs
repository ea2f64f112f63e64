//! Validation gate for placement operations.
//!
//! Side-effect-free reads that run before a write scope is opened. Checks
//! and the write that follows are not atomic together: a template could
//! leave Draft between the two. Single-editor use makes that window
//! acceptable, so it is not retried or re-checked.

use std::sync::Arc;

use fitplan_domain::{
    ExerciseId, PlacementId, TemplateExercisePlacement, WorkoutPhase, WorkoutTemplate,
    WorkoutTemplateId,
};

use crate::infrastructure::ports::{
    ExerciseRepo, PlacementReadScope, PlacementStore, RepoError, WorkoutTemplateRepo,
};

use super::error::PlacementError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseStatus {
    Missing,
    Inactive,
    Active,
}

pub struct PlacementValidator {
    templates: Arc<dyn WorkoutTemplateRepo>,
    exercises: Arc<dyn ExerciseRepo>,
    placements: Arc<dyn PlacementStore>,
}

impl PlacementValidator {
    pub fn new(
        templates: Arc<dyn WorkoutTemplateRepo>,
        exercises: Arc<dyn ExerciseRepo>,
        placements: Arc<dyn PlacementStore>,
    ) -> Self {
        Self {
            templates,
            exercises,
            placements,
        }
    }

    pub async fn does_template_exist(&self, id: WorkoutTemplateId) -> Result<bool, RepoError> {
        Ok(self.templates.get(id).await?.is_some())
    }

    /// False, not an error, for a missing template.
    pub async fn is_template_mutable(&self, id: WorkoutTemplateId) -> Result<bool, RepoError> {
        Ok(self
            .templates
            .get(id)
            .await?
            .is_some_and(|template| template.is_mutable()))
    }

    pub async fn exercise_status(&self, id: ExerciseId) -> Result<ExerciseStatus, RepoError> {
        Ok(match self.exercises.get(id).await? {
            None => ExerciseStatus::Missing,
            Some(exercise) if exercise.is_active => ExerciseStatus::Active,
            Some(_) => ExerciseStatus::Inactive,
        })
    }

    pub async fn is_exercise_active(&self, id: ExerciseId) -> Result<bool, RepoError> {
        Ok(self.exercise_status(id).await? == ExerciseStatus::Active)
    }

    pub fn is_phase_valid(phase: &str) -> bool {
        phase.parse::<WorkoutPhase>().is_ok()
    }

    pub async fn placement_belongs_to_template(
        &self,
        placement_id: PlacementId,
        template_id: WorkoutTemplateId,
    ) -> Result<bool, RepoError> {
        Ok(self.find_placement(placement_id, template_id).await?.is_some())
    }

    // =========================================================================
    // Guards used by the operations; each maps a failed check to its error.
    // =========================================================================

    pub fn require_phase(phase: &str) -> Result<WorkoutPhase, PlacementError> {
        phase.parse::<WorkoutPhase>().map_err(|e| {
            tracing::warn!(phase = %phase, "Rejected unknown workout phase");
            PlacementError::from(e)
        })
    }

    /// The template must exist (`NotFound`) and be in Draft (`InvalidState`).
    pub async fn require_mutable_template(
        &self,
        id: WorkoutTemplateId,
    ) -> Result<WorkoutTemplate, PlacementError> {
        let template = self.require_template(id).await?;
        if !template.is_mutable() {
            tracing::warn!(
                template_id = %id,
                state = %template.state,
                "Rejected change to non-draft template"
            );
            return Err(PlacementError::template_not_draft(id));
        }
        Ok(template)
    }

    pub async fn require_template(
        &self,
        id: WorkoutTemplateId,
    ) -> Result<WorkoutTemplate, PlacementError> {
        self.templates.get(id).await?.ok_or_else(|| {
            tracing::warn!(template_id = %id, "Workout template not found");
            PlacementError::template_not_found(id)
        })
    }

    pub async fn require_active_exercise(&self, id: ExerciseId) -> Result<(), PlacementError> {
        match self.exercise_status(id).await? {
            ExerciseStatus::Active => Ok(()),
            ExerciseStatus::Missing => {
                tracing::warn!(exercise_id = %id, "Exercise not found");
                Err(PlacementError::exercise_not_found(id))
            }
            ExerciseStatus::Inactive => {
                tracing::warn!(exercise_id = %id, "Rejected inactive exercise");
                Err(PlacementError::ExerciseInactive(id))
            }
        }
    }

    /// A placement owned by another template is reported as not found.
    pub async fn require_placement(
        &self,
        placement_id: PlacementId,
        template_id: WorkoutTemplateId,
    ) -> Result<TemplateExercisePlacement, PlacementError> {
        self.find_placement(placement_id, template_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(
                    placement_id = %placement_id,
                    template_id = %template_id,
                    "Placement not found in template"
                );
                PlacementError::placement_not_found(placement_id)
            })
    }

    async fn find_placement(
        &self,
        placement_id: PlacementId,
        template_id: WorkoutTemplateId,
    ) -> Result<Option<TemplateExercisePlacement>, RepoError> {
        let mut scope = self.placements.read_only().await?;
        Ok(scope
            .get_by_id(placement_id)
            .await?
            .filter(|placement| placement.template_id == template_id))
    }
}
