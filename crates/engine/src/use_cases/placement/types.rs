//! Placement operation result types.

use fitplan_domain::{
    RoundNumber, TemplateExercisePlacement, WorkoutPhase, WorkoutTemplateId,
};
use serde::Serialize;

/// Placements created by one AddExercise call: the primary first, then
/// auto-linked warm-ups and cool-downs in link order.
#[derive(Debug, Clone, Serialize)]
pub struct AddExerciseResult {
    pub added: Vec<TemplateExercisePlacement>,
    pub count: usize,
    pub message: String,
}

impl AddExerciseResult {
    pub fn new(added: Vec<TemplateExercisePlacement>) -> Self {
        let count = added.len();
        Self {
            added,
            count,
            message: format!("Successfully added {count} exercise(s) to the template"),
        }
    }
}

/// The removed placement, its cascaded orphans, and siblings renumbered by compaction.
#[derive(Debug, Clone, Serialize)]
pub struct RemoveExerciseResult {
    pub removed: Vec<TemplateExercisePlacement>,
    pub reordered: Vec<TemplateExercisePlacement>,
    pub count: usize,
    pub message: String,
}

impl RemoveExerciseResult {
    pub fn new(
        removed: Vec<TemplateExercisePlacement>,
        reordered: Vec<TemplateExercisePlacement>,
    ) -> Self {
        let count = removed.len();
        Self {
            removed,
            reordered,
            count,
            message: format!("Successfully removed {count} exercise(s) from the template"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateMetadataResult {
    pub updated: TemplateExercisePlacement,
    pub message: String,
}

impl UpdateMetadataResult {
    pub fn new(updated: TemplateExercisePlacement) -> Self {
        Self {
            updated,
            message: "Exercise metadata updated successfully".to_string(),
        }
    }
}

/// Only the group members whose `order_in_round` actually changed.
#[derive(Debug, Clone, Serialize)]
pub struct ReorderExerciseResult {
    pub reordered: Vec<TemplateExercisePlacement>,
    pub count: usize,
    pub message: String,
}

impl ReorderExerciseResult {
    pub fn new(reordered: Vec<TemplateExercisePlacement>) -> Self {
        let count = reordered.len();
        Self {
            reordered,
            count,
            message: format!("Successfully reordered {count} exercise(s)"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CopyRoundResult {
    pub copied: Vec<TemplateExercisePlacement>,
    pub count: usize,
    pub message: String,
}

impl CopyRoundResult {
    pub fn new(
        copied: Vec<TemplateExercisePlacement>,
        target_phase: WorkoutPhase,
        target_round: RoundNumber,
    ) -> Self {
        let count = copied.len();
        Self {
            copied,
            count,
            message: format!(
                "Successfully copied {count} exercise(s) to {target_phase} round {target_round}"
            ),
        }
    }
}

/// Read model: phases in Warmup, Main, Cooldown order, rounds ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizedTemplate {
    pub template_id: WorkoutTemplateId,
    pub phases: Vec<PhaseView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseView {
    pub phase: WorkoutPhase,
    pub rounds: Vec<RoundView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundView {
    pub round_number: RoundNumber,
    pub exercises: Vec<TemplateExercisePlacement>,
}

impl OrganizedTemplate {
    pub fn total_exercises(&self) -> usize {
        self.phases
            .iter()
            .flat_map(|phase| &phase.rounds)
            .map(|round| round.exercises.len())
            .sum()
    }

    pub fn phase(&self, phase: WorkoutPhase) -> Option<&PhaseView> {
        self.phases.iter().find(|view| view.phase == phase)
    }
}
