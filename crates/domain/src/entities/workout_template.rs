//! Workout template summary, as seen by the placement engine.

use serde::{Deserialize, Serialize};

use crate::ids::WorkoutTemplateId;
use crate::value_objects::WorkoutState;

/// The parts of a workout template that gate placement changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    pub id: WorkoutTemplateId,
    pub name: String,
    pub state: WorkoutState,
}

impl WorkoutTemplate {
    pub fn new(name: impl Into<String>, state: WorkoutState) -> Self {
        Self {
            id: WorkoutTemplateId::new(),
            name: name.into(),
            state,
        }
    }

    pub fn is_mutable(&self) -> bool {
        self.state.is_mutable()
    }
}
