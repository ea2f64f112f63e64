//! Copy round use case.
//!
//! Duplicates every placement of one group into another, appending after
//! whatever the target group already holds. Copies are direct placements:
//! auto-linking is not re-run for copied Main exercises.

use std::sync::Arc;

use fitplan_domain::{PlacementGroup, RoundNumber, WorkoutTemplateId};

use crate::infrastructure::ports::{
    ClockPort, PlacementReadScope, PlacementStore, PlacementWriteScope,
};

use super::error::PlacementError;
use super::ordering;
use super::types::CopyRoundResult;
use super::validation::PlacementValidator;

#[derive(Debug, Clone)]
pub struct CopyRoundInput {
    pub source_phase: String,
    pub source_round: u32,
    pub target_phase: String,
    pub target_round: u32,
}

pub struct CopyRound {
    validator: Arc<PlacementValidator>,
    placements: Arc<dyn PlacementStore>,
    clock: Arc<dyn ClockPort>,
}

impl CopyRound {
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
        input: CopyRoundInput,
    ) -> Result<CopyRoundResult, PlacementError> {
        let source = PlacementGroup::new(
            template_id,
            PlacementValidator::require_phase(&input.source_phase)?,
            RoundNumber::new(input.source_round)?,
        );
        let target = PlacementGroup::new(
            template_id,
            PlacementValidator::require_phase(&input.target_phase)?,
            RoundNumber::new(input.target_round)?,
        );
        if source == target {
            tracing::warn!(template_id = %template_id, "Rejected copy of a round onto itself");
            return Err(PlacementError::InvalidInput(
                "Source and target round must differ".to_string(),
            ));
        }

        self.validator.require_mutable_template(template_id).await?;

        let now = self.clock.now();
        let mut scope = self.placements.writable().await?;

        let originals = ordering::sorted(&scope.get_by_round(source).await?);
        if originals.is_empty() {
            tracing::warn!(
                template_id = %template_id,
                phase = %source.phase,
                round = %source.round_number,
                "Rejected copy of an empty round"
            );
            return Err(PlacementError::InvalidInput(format!(
                "No exercises found in {} round {}",
                source.phase, source.round_number
            )));
        }

        let first_order = ordering::order_after(scope.get_max_order_in_round(target).await?);
        let mut copied = Vec::with_capacity(originals.len());
        for (order, original) in (first_order..).zip(&originals) {
            let copy = original.copy_into(target, order, now);
            scope.add(&copy).await?;
            copied.push(copy);
        }

        scope.commit().await?;

        tracing::info!(
            template_id = %template_id,
            source_phase = %source.phase,
            source_round = %source.round_number,
            target_phase = %target.phase,
            target_round = %target.round_number,
            copied = copied.len(),
            "Copied round"
        );

        Ok(CopyRoundResult::new(copied, target.phase, target.round_number))
    }
}
