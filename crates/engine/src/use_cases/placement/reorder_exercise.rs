//! Reorder exercise use case.

use std::sync::Arc;

use fitplan_domain::{PlacementId, WorkoutTemplateId};

use crate::infrastructure::ports::{
    ClockPort, PlacementReadScope, PlacementStore, PlacementWriteScope,
};

use super::error::PlacementError;
use super::ordering;
use super::types::ReorderExerciseResult;
use super::validation::PlacementValidator;

/// Moves a placement within its own group. Out-of-range targets are
/// clamped to the group bounds.
pub struct ReorderExercise {
    validator: Arc<PlacementValidator>,
    placements: Arc<dyn PlacementStore>,
    clock: Arc<dyn ClockPort>,
}

impl ReorderExercise {
    pub fn new(
        validator: Arc<PlacementValidator>,
        placements: Arc<dyn PlacementStore>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            validator,
            placements,
            clock,
        }
    }

    pub async fn execute(
        &self,
        template_id: WorkoutTemplateId,
        placement_id: PlacementId,
        new_order: u32,
    ) -> Result<ReorderExerciseResult, PlacementError> {
        self.validator.require_mutable_template(template_id).await?;
        self.validator
            .require_placement(placement_id, template_id)
            .await?;

        let mut scope = self.placements.writable().await?;
        let placement = scope
            .get_by_id(placement_id)
            .await?
            .filter(|p| p.template_id == template_id)
            .ok_or_else(|| PlacementError::placement_not_found(placement_id))?;

        let group = scope.get_by_round(placement.group()).await?;
        let changed = ordering::reorder(&group, placement_id, new_order, self.clock.now())
            .ok_or_else(|| PlacementError::placement_not_found(placement_id))?;

        for sibling in &changed {
            scope.update(sibling).await?;
        }
        scope.commit().await?;

        tracing::info!(
            template_id = %template_id,
            placement_id = %placement_id,
            new_order = new_order,
            changed = changed.len(),
            "Reordered exercise"
        );

        Ok(ReorderExerciseResult::new(changed))
    }
}
