//! Auto-linking of warm-up and cool-down companions.
//!
//! When a Main exercise is placed, its active WARMUP and COOLDOWN links are
//! resolved and each target exercise not already somewhere in the template
//! is appended to round 1 of the matching phase.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use fitplan_domain::{
    ExerciseLinkType, PlacementGroup, RoundNumber, TemplateExercisePlacement,
};

use crate::infrastructure::ports::{ClockPort, ExerciseLinkRepo, RepoError};

use super::ordering;

pub struct AutoLinker {
    links: Arc<dyn ExerciseLinkRepo>,
    clock: Arc<dyn ClockPort>,
}

impl AutoLinker {
    pub fn new(links: Arc<dyn ExerciseLinkRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { links, clock }
    }

    /// Companion placements to create alongside `primary`.
    ///
    /// `existing` is every placement already in the template, the primary
    /// included. WARMUP links are applied before COOLDOWN links, each in
    /// the order the link repository returns them. Non-Main primaries get
    /// no companions.
    pub async fn resolve(
        &self,
        primary: &TemplateExercisePlacement,
        existing: &[TemplateExercisePlacement],
    ) -> Result<Vec<TemplateExercisePlacement>, RepoError> {
        if !primary.phase.is_main() {
            return Ok(Vec::new());
        }

        let now = self.clock.now();
        let mut present: HashSet<_> = existing.iter().map(|p| p.exercise_id).collect();
        present.insert(primary.exercise_id);

        let mut next_orders: HashMap<PlacementGroup, u32> = HashMap::new();
        let mut created = Vec::new();

        for link_type in ExerciseLinkType::AUTO_LINKED {
            let links = self
                .links
                .links_by_source(primary.exercise_id, link_type)
                .await?;

            for link in links.into_iter().filter(|link| link.is_active) {
                let target = link.target_exercise_id;
                if !present.insert(target) {
                    tracing::debug!(
                        template_id = %primary.template_id,
                        exercise_id = %target,
                        link_type = %link_type,
                        "Linked exercise already in template, not auto-adding"
                    );
                    continue;
                }

                let group = PlacementGroup::new(
                    primary.template_id,
                    link_type.target_phase(),
                    RoundNumber::FIRST,
                );
                let order = next_orders.entry(group).or_insert_with(|| {
                    let members: Vec<_> = existing
                        .iter()
                        .filter(|p| p.is_in(&group))
                        .cloned()
                        .collect();
                    ordering::next_order(&members)
                });

                tracing::debug!(
                    template_id = %primary.template_id,
                    exercise_id = %target,
                    phase = %group.phase,
                    order = *order,
                    "Auto-adding linked exercise"
                );
                created.push(TemplateExercisePlacement::auto_linked(group, target, *order, now));
                *order += 1;
            }
        }

        Ok(created)
    }
}
