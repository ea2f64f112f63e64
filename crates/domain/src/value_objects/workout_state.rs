//! Lifecycle state of a workout template.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkoutState {
    Draft,
    Production,
    Archived,
}

impl WorkoutState {
    /// Only draft templates accept structural changes.
    pub fn is_mutable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Production => "PRODUCTION",
            Self::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for WorkoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DRAFT" => Ok(Self::Draft),
            "PRODUCTION" => Ok(Self::Production),
            "ARCHIVED" => Ok(Self::Archived),
            _ => Err(DomainError::parse(format!("Unknown workout state: {}", s))),
        }
    }
}
