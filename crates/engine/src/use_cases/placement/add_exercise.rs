//! Add exercise use case.
//!
//! Places an exercise into a template group and, for Main placements,
//! pulls in its linked warm-ups and cool-downs in the same write.

use std::sync::Arc;

use fitplan_domain::{
    ExerciseId, ExerciseMetadata, PlacementGroup, RoundNumber, TemplateExercisePlacement,
    WorkoutTemplateId,
};

use crate::infrastructure::ports::{
    ClockPort, PlacementReadScope, PlacementStore, PlacementWriteScope,
};

use super::auto_link::AutoLinker;
use super::error::PlacementError;
use super::ordering;
use super::types::AddExerciseResult;
use super::validation::PlacementValidator;

/// Raw request values; parsing happens inside the use case.
#[derive(Debug, Clone)]
pub struct AddExerciseInput {
    pub exercise_id: ExerciseId,
    pub phase: String,
    pub round_number: u32,
    pub metadata: String,
}

pub struct AddExercise {
    validator: Arc<PlacementValidator>,
    auto_linker: Arc<AutoLinker>,
    placements: Arc<dyn PlacementStore>,
    clock: Arc<dyn ClockPort>,
}

impl AddExercise {
    pub fn new(
        validator: Arc<PlacementValidator>,
        auto_linker: Arc<AutoLinker>,
        placements: Arc<dyn PlacementStore>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            validator,
            auto_linker,
            placements,
            clock,
        }
    }

    /// Execute the add exercise use case.
    ///
    /// # Returns
    /// * `Ok(AddExerciseResult)` - Primary placement first, then auto-linked ones
    /// * `Err(PlacementError)` - Validation failed or the write was rolled back
    pub async fn execute(
        &self,
        template_id: WorkoutTemplateId,
        input: AddExerciseInput,
    ) -> Result<AddExerciseResult, PlacementError> {
        let phase = PlacementValidator::require_phase(&input.phase)?;
        let round_number = RoundNumber::new(input.round_number)?;
        let metadata = ExerciseMetadata::parse(input.metadata)?;

        self.validator.require_mutable_template(template_id).await?;
        self.validator
            .require_active_exercise(input.exercise_id)
            .await?;

        let group = PlacementGroup::new(template_id, phase, round_number);
        let now = self.clock.now();

        let mut scope = self.placements.writable().await?;

        let order = ordering::order_after(scope.get_max_order_in_round(group).await?);
        let primary =
            TemplateExercisePlacement::new(group, input.exercise_id, order, metadata, now);
        scope.add(&primary).await?;

        let mut added = vec![primary.clone()];
        if phase.is_main() {
            let existing = scope.get_by_template(template_id).await?;
            let linked = self.auto_linker.resolve(&primary, &existing).await?;
            for placement in &linked {
                scope.add(placement).await?;
            }
            added.extend(linked);
        }

        scope.commit().await?;

        tracing::info!(
            template_id = %template_id,
            exercise_id = %input.exercise_id,
            phase = %phase,
            round = %round_number,
            order = order,
            added = added.len(),
            "Added exercise to template"
        );

        Ok(AddExerciseResult::new(added))
    }
}
