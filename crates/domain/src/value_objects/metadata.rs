//! Exercise metadata - the set/rep/time scheme attached to a placement.

use std::fmt;

use serde::{de::IgnoredAny, Deserialize, Serialize};

use crate::error::DomainError;

/// Opaque metadata payload.
///
/// Only JSON syntax is checked; what the payload means (sets, reps, duration)
/// belongs to the execution protocol, not to placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExerciseMetadata(String);

impl ExerciseMetadata {
    pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation(
                "Metadata is required for exercise configuration",
            ));
        }
        serde_json::from_str::<IgnoredAny>(trimmed)
            .map_err(|e| DomainError::validation(format!("Metadata is not valid JSON: {}", e)))?;
        Ok(Self(trimmed.to_string()))
    }

    /// Metadata given to auto-linked placements, which the caller never configured.
    pub fn empty_object() -> Self {
        Self("{}".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExerciseMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ExerciseMetadata {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ExerciseMetadata> for String {
    fn from(value: ExerciseMetadata) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_any_well_formed_json() {
        assert!(ExerciseMetadata::parse(r#"{"reps": 10, "sets": 3}"#).is_ok());
        assert!(ExerciseMetadata::parse("[1, 2, 3]").is_ok());
        assert!(ExerciseMetadata::parse("{}").is_ok());
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let metadata = ExerciseMetadata::parse("  {\"duration\": 30}\n").unwrap();
        assert_eq!(metadata.as_str(), "{\"duration\": 30}");
    }

    #[test]
    fn rejects_blank_metadata() {
        let err = ExerciseMetadata::parse("   ").unwrap_err();
        assert!(err.to_string().contains("required"));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = ExerciseMetadata::parse("{reps: 10").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(err.to_string().contains("not valid JSON"));
    }
}
