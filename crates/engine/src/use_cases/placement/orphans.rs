//! Orphan detection for auto-linked companions.
//!
//! Removing a Main placement can leave the warm-ups and cool-downs it pulled
//! in without any remaining Main exercise linking to them. Those auto-linked
//! placements are orphans and go with it. Directly added placements never do.

use std::collections::HashMap;
use std::sync::Arc;

use fitplan_domain::{ExerciseId, ExerciseLinkType, TemplateExercisePlacement};

use crate::infrastructure::ports::{ExerciseLinkRepo, RepoError};

/// Link targets already fetched during one detection pass.
type LinkCache = HashMap<(ExerciseId, ExerciseLinkType), Vec<ExerciseId>>;

pub struct OrphanDetector {
    links: Arc<dyn ExerciseLinkRepo>,
}

impl OrphanDetector {
    pub fn new(links: Arc<dyn ExerciseLinkRepo>) -> Self {
        Self { links }
    }

    /// Auto-linked placements orphaned by removing `removed`.
    ///
    /// `remaining` is the template's placements with `removed` already
    /// excluded. A target stays while any remaining Main placement links to
    /// it with the same link type, including another placement of the very
    /// exercise being removed.
    pub async fn find_orphans(
        &self,
        removed: &TemplateExercisePlacement,
        remaining: &[TemplateExercisePlacement],
    ) -> Result<Vec<TemplateExercisePlacement>, RepoError> {
        if !removed.phase.is_main() {
            return Ok(Vec::new());
        }

        let mut cache = LinkCache::new();
        let remaining_main: Vec<ExerciseId> = remaining
            .iter()
            .filter(|p| p.phase.is_main())
            .map(|p| p.exercise_id)
            .collect();
        let mut orphans: Vec<TemplateExercisePlacement> = Vec::new();

        for link_type in ExerciseLinkType::AUTO_LINKED {
            let candidates = self
                .targets(&mut cache, removed.exercise_id, link_type)
                .await?;

            for target in candidates {
                if self
                    .still_referenced(&mut cache, &remaining_main, target, link_type)
                    .await?
                {
                    tracing::debug!(
                        template_id = %removed.template_id,
                        exercise_id = %target,
                        link_type = %link_type,
                        "Linked exercise still referenced, keeping"
                    );
                    continue;
                }

                let phase = link_type.target_phase();
                for placement in remaining.iter().filter(|p| {
                    p.auto_linked && p.exercise_id == target && p.phase == phase
                }) {
                    if orphans.iter().any(|o| o.id == placement.id) {
                        continue;
                    }
                    tracing::debug!(
                        template_id = %removed.template_id,
                        placement_id = %placement.id,
                        exercise_id = %target,
                        "Auto-linked placement orphaned"
                    );
                    orphans.push(placement.clone());
                }
            }
        }

        Ok(orphans)
    }

    async fn still_referenced(
        &self,
        cache: &mut LinkCache,
        remaining_main: &[ExerciseId],
        target: ExerciseId,
        link_type: ExerciseLinkType,
    ) -> Result<bool, RepoError> {
        for source in remaining_main {
            if self
                .targets(cache, *source, link_type)
                .await?
                .contains(&target)
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn targets(
        &self,
        cache: &mut LinkCache,
        source: ExerciseId,
        link_type: ExerciseLinkType,
    ) -> Result<Vec<ExerciseId>, RepoError> {
        if let Some(targets) = cache.get(&(source, link_type)) {
            return Ok(targets.clone());
        }

        let mut targets: Vec<ExerciseId> = Vec::new();
        for link in self.links.links_by_source(source, link_type).await? {
            if link.is_active && !targets.contains(&link.target_exercise_id) {
                targets.push(link.target_exercise_id);
            }
        }
        cache.insert((source, link_type), targets.clone());
        Ok(targets)
    }
}
