//! Remove exercise use case.
//!
//! Deletes a placement together with any auto-linked companions it
//! orphans, then closes the ordering gaps left in every touched group.

use std::collections::BTreeSet;
use std::sync::Arc;

use fitplan_domain::{PlacementId, TemplateExercisePlacement, WorkoutTemplateId};

use crate::infrastructure::ports::{
    ClockPort, PlacementReadScope, PlacementStore, PlacementWriteScope,
};

use super::error::PlacementError;
use super::ordering;
use super::orphans::OrphanDetector;
use super::types::RemoveExerciseResult;
use super::validation::PlacementValidator;

pub struct RemoveExercise {
    validator: Arc<PlacementValidator>,
    orphans: Arc<OrphanDetector>,
    placements: Arc<dyn PlacementStore>,
    clock: Arc<dyn ClockPort>,
}

impl RemoveExercise {
    pub fn new(
        validator: Arc<PlacementValidator>,
        orphans: Arc<OrphanDetector>,
        placements: Arc<dyn PlacementStore>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            validator,
            orphans,
            placements,
            clock,
        }
    }

    /// Execute the remove exercise use case.
    ///
    /// The primary deletion, the orphan cascade and compaction commit
    /// together; any failure leaves the template as it was.
    pub async fn execute(
        &self,
        template_id: WorkoutTemplateId,
        placement_id: PlacementId,
    ) -> Result<RemoveExerciseResult, PlacementError> {
        self.validator.require_mutable_template(template_id).await?;
        self.validator
            .require_placement(placement_id, template_id)
            .await?;

        let now = self.clock.now();
        let mut scope = self.placements.writable().await?;

        let target = scope
            .get_by_id(placement_id)
            .await?
            .filter(|p| p.template_id == template_id)
            .ok_or_else(|| PlacementError::placement_not_found(placement_id))?;

        let remaining: Vec<TemplateExercisePlacement> = scope
            .get_by_template(template_id)
            .await?
            .into_iter()
            .filter(|p| p.id != placement_id)
            .collect();

        let orphans = self.orphans.find_orphans(&target, &remaining).await?;

        let mut removed = Vec::with_capacity(orphans.len() + 1);
        removed.push(target);
        removed.extend(orphans);
        let removed_ids: Vec<PlacementId> = removed.iter().map(|p| p.id).collect();

        scope.delete_batch(&removed_ids).await?;

        let touched: BTreeSet<_> = removed.iter().map(|p| p.group()).collect();
        let survivors: Vec<_> = remaining
            .into_iter()
            .filter(|p| !removed_ids.contains(&p.id))
            .collect();

        let mut reordered = Vec::new();
        for group in touched {
            let members: Vec<_> = survivors.iter().filter(|p| p.is_in(&group)).cloned().collect();
            for placement in ordering::compact(&members, now) {
                scope.update(&placement).await?;
                reordered.push(placement);
            }
        }

        scope.commit().await?;

        tracing::info!(
            template_id = %template_id,
            placement_id = %placement_id,
            removed = removed.len(),
            cascaded = removed.len() - 1,
            reordered = reordered.len(),
            "Removed exercise from template"
        );

        Ok(RemoveExerciseResult::new(removed, reordered))
    }
}
