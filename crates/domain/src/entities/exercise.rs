//! Exercise reference data.

use serde::{Deserialize, Serialize};

use crate::ids::ExerciseId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    pub is_active: bool,
}

impl Exercise {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ExerciseId::new(),
            name: name.into(),
            is_active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}
