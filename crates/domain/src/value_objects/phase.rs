//! Workout phase (a.k.a. zone) - the structural section a placement belongs to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// One of the three structural sections of a workout template.
///
/// Parsing is case-insensitive and also accepts `workout` for [`WorkoutPhase::Main`],
/// the name older clients still send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum WorkoutPhase {
    Warmup,
    Main,
    Cooldown,
}

impl WorkoutPhase {
    /// All phases in display order.
    pub const ALL: [WorkoutPhase; 3] = [Self::Warmup, Self::Main, Self::Cooldown];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warmup => "Warmup",
            Self::Main => "Main",
            Self::Cooldown => "Cooldown",
        }
    }

    /// Whether placing an exercise in this phase triggers warm-up/cool-down linking.
    pub fn is_main(&self) -> bool {
        matches!(self, Self::Main)
    }
}

impl fmt::Display for WorkoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutPhase {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warmup" => Ok(Self::Warmup),
            "main" | "workout" => Ok(Self::Main),
            "cooldown" => Ok(Self::Cooldown),
            _ => Err(DomainError::parse(format!(
                "Invalid phase '{}'. Must be Warmup, Main, or Cooldown",
                s
            ))),
        }
    }
}

impl TryFrom<String> for WorkoutPhase {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
