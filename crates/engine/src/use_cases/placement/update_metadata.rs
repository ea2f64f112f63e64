//! Update metadata use case.

use std::sync::Arc;

use fitplan_domain::{ExerciseMetadata, PlacementId, WorkoutTemplateId};

use crate::infrastructure::ports::{
    ClockPort, PlacementReadScope, PlacementStore, PlacementWriteScope,
};

use super::error::PlacementError;
use super::types::UpdateMetadataResult;
use super::validation::PlacementValidator;

/// Replaces a placement's metadata. No ordering or linking side effects.
pub struct UpdateMetadata {
    validator: Arc<PlacementValidator>,
    placements: Arc<dyn PlacementStore>,
    clock: Arc<dyn ClockPort>,
}

impl UpdateMetadata {
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
        metadata: String,
    ) -> Result<UpdateMetadataResult, PlacementError> {
        let metadata = ExerciseMetadata::parse(metadata)?;

        self.validator.require_mutable_template(template_id).await?;
        self.validator
            .require_placement(placement_id, template_id)
            .await?;

        let mut scope = self.placements.writable().await?;
        let mut placement = scope
            .get_by_id(placement_id)
            .await?
            .filter(|p| p.template_id == template_id)
            .ok_or_else(|| PlacementError::placement_not_found(placement_id))?;

        placement.set_metadata(metadata, self.clock.now());
        scope.update(&placement).await?;
        scope.commit().await?;

        tracing::info!(
            template_id = %template_id,
            placement_id = %placement_id,
            "Updated exercise metadata"
        );

        Ok(UpdateMetadataResult::new(placement))
    }
}
