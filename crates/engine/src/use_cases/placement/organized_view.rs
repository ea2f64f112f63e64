//! Organized template view (read-only).

use std::collections::BTreeMap;
use std::sync::Arc;

use fitplan_domain::{WorkoutPhase, WorkoutTemplateId};

use crate::infrastructure::ports::{PlacementReadScope, PlacementStore};

use super::error::PlacementError;
use super::ordering;
use super::types::{OrganizedTemplate, PhaseView, RoundView};
use super::validation::PlacementValidator;

/// Groups a template's placements by phase, then round. All three phases
/// are always present, possibly with no rounds.
pub struct GetOrganizedView {
    validator: Arc<PlacementValidator>,
    placements: Arc<dyn PlacementStore>,
}

impl GetOrganizedView {
    pub fn new(validator: Arc<PlacementValidator>, placements: Arc<dyn PlacementStore>) -> Self {
        Self {
            validator,
            placements,
        }
    }

    pub async fn execute(
        &self,
        template_id: WorkoutTemplateId,
    ) -> Result<OrganizedTemplate, PlacementError> {
        self.validator.require_template(template_id).await?;

        let mut scope = self.placements.read_only().await?;
        let placements = scope.get_by_template(template_id).await?;

        let phases = WorkoutPhase::ALL
            .into_iter()
            .map(|phase| {
                let mut rounds = BTreeMap::new();
                for placement in placements.iter().filter(|p| p.phase == phase) {
                    rounds
                        .entry(placement.round_number)
                        .or_insert_with(Vec::new)
                        .push(placement.clone());
                }
                PhaseView {
                    phase,
                    rounds: rounds
                        .into_iter()
                        .map(|(round_number, exercises)| RoundView {
                            round_number,
                            exercises: ordering::sorted(&exercises),
                        })
                        .collect(),
                }
            })
            .collect();

        Ok(OrganizedTemplate {
            template_id,
            phases,
        })
    }
}
