//! Exercise link types consumed by auto-linking.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::WorkoutPhase;
use crate::error::DomainError;

/// How a source exercise recommends a target exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExerciseLinkType {
    Warmup,
    Cooldown,
}

impl ExerciseLinkType {
    /// Link types in the order auto-linking applies them.
    pub const AUTO_LINKED: [ExerciseLinkType; 2] = [Self::Warmup, Self::Cooldown];

    /// Phase that an auto-linked target of this type is placed in.
    pub fn target_phase(&self) -> WorkoutPhase {
        match self {
            Self::Warmup => WorkoutPhase::Warmup,
            Self::Cooldown => WorkoutPhase::Cooldown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warmup => "WARMUP",
            Self::Cooldown => "COOLDOWN",
        }
    }
}

impl fmt::Display for ExerciseLinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseLinkType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "WARMUP" => Ok(Self::Warmup),
            "COOLDOWN" => Ok(Self::Cooldown),
            _ => Err(DomainError::parse(format!("Unknown link type: {}", s))),
        }
    }
}
