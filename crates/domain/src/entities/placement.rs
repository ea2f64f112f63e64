//! Template exercise placement - an exercise's occurrence at a specific
//! template / phase / round / order position.
//!
//! Within one [`PlacementGroup`] the `order_in_round` values are dense and
//! contiguous: a group of N placements holds exactly the orders `1..=N`.
//! The entity cannot enforce that on its own; the engine's ordering
//! functions keep it true after every structural change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ExerciseId, PlacementId, WorkoutTemplateId};
use crate::value_objects::{ExerciseMetadata, RoundNumber, WorkoutPhase};

/// The (template, phase, round) triple that scopes ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlacementGroup {
    pub template_id: WorkoutTemplateId,
    pub phase: WorkoutPhase,
    pub round_number: RoundNumber,
}

impl PlacementGroup {
    pub fn new(template_id: WorkoutTemplateId, phase: WorkoutPhase, round_number: RoundNumber) -> Self {
        Self {
            template_id,
            phase,
            round_number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateExercisePlacement {
    pub id: PlacementId,
    pub template_id: WorkoutTemplateId,
    pub exercise_id: ExerciseId,
    pub phase: WorkoutPhase,
    pub round_number: RoundNumber,
    /// 1-based position inside the placement's group
    pub order_in_round: u32,
    pub metadata: ExerciseMetadata,
    /// Created by auto-linking rather than by the caller. Only auto-linked
    /// placements are eligible for orphan cleanup.
    pub auto_linked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TemplateExercisePlacement {
    /// A placement the caller asked for directly.
    pub fn new(
        group: PlacementGroup,
        exercise_id: ExerciseId,
        order_in_round: u32,
        metadata: ExerciseMetadata,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PlacementId::new(),
            template_id: group.template_id,
            exercise_id,
            phase: group.phase,
            round_number: group.round_number,
            order_in_round,
            metadata,
            auto_linked: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// A warm-up or cool-down companion inserted on behalf of a main exercise.
    pub fn auto_linked(
        group: PlacementGroup,
        exercise_id: ExerciseId,
        order_in_round: u32,
        now: DateTime<Utc>,
    ) -> Self {
        let mut placement = Self::new(
            group,
            exercise_id,
            order_in_round,
            ExerciseMetadata::empty_object(),
            now,
        );
        placement.auto_linked = true;
        placement
    }

    /// A verbatim copy into another group with a fresh identity.
    ///
    /// Copies are direct placements even when the source was auto-linked.
    pub fn copy_into(&self, group: PlacementGroup, order_in_round: u32, now: DateTime<Utc>) -> Self {
        Self::new(group, self.exercise_id, order_in_round, self.metadata.clone(), now)
    }

    pub fn group(&self) -> PlacementGroup {
        PlacementGroup::new(self.template_id, self.phase, self.round_number)
    }

    pub fn is_in(&self, group: &PlacementGroup) -> bool {
        self.group() == *group
    }

    pub fn set_order(&mut self, order_in_round: u32, now: DateTime<Utc>) {
        self.order_in_round = order_in_round;
        self.updated_at = now;
    }

    pub fn set_metadata(&mut self, metadata: ExerciseMetadata, now: DateTime<Utc>) {
        self.metadata = metadata;
        self.updated_at = now;
    }
}
