//! Round number within a phase.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A 1-based repetition group within a phase (e.g. superset round 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RoundNumber(u32);

impl RoundNumber {
    /// Round used for auto-linked warm-up and cool-down placements.
    pub const FIRST: RoundNumber = RoundNumber(1);

    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::validation("Round number must be at least 1"));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RoundNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for RoundNumber {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoundNumber> for u32 {
    fn from(value: RoundNumber) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert!(matches!(RoundNumber::new(0), Err(DomainError::Validation(_))));
    }

    #[test]
    fn positive_values_are_kept() {
        assert_eq!(RoundNumber::new(3).map(|r| r.value()), Ok(3));
        assert_eq!(RoundNumber::FIRST.value(), 1);
    }

    #[test]
    fn deserialization_validates() {
        assert!(serde_json::from_str::<RoundNumber>("0").is_err());
        let round: RoundNumber = serde_json::from_str("2").unwrap();
        assert_eq!(round.value(), 2);
    }
}
