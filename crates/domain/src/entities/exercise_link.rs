//! Exercise link - "source recommends target as its warm-up/cool-down".
//!
//! Links are owned by the exercise-link service; the placement engine only
//! reads them, always by source exercise.

use serde::{Deserialize, Serialize};

use crate::ids::{ExerciseId, ExerciseLinkId};
use crate::value_objects::ExerciseLinkType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseLink {
    pub id: ExerciseLinkId,
    pub source_exercise_id: ExerciseId,
    pub target_exercise_id: ExerciseId,
    pub link_type: ExerciseLinkType,
    /// Position among the source's links of the same type, ascending
    pub display_order: u32,
    pub is_active: bool,
}

impl ExerciseLink {
    pub fn new(
        source_exercise_id: ExerciseId,
        target_exercise_id: ExerciseId,
        link_type: ExerciseLinkType,
        display_order: u32,
    ) -> Self {
        Self {
            id: ExerciseLinkId::new(),
            source_exercise_id,
            target_exercise_id,
            link_type,
            display_order,
            is_active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}
