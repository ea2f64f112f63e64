//! Unified error type for the domain layer.
//!
//! Value objects validate on construction and report failures through
//! [`DomainError`], so adapters never have to pass raw strings around.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for values outside the allowed domain.
    ///
    /// # Example
    /// ```ignore
    /// if round == 0 {
    ///     return Err(DomainError::validation("Round number must be at least 1"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("round must be positive");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: round must be positive");
    }

    #[test]
    fn test_parse_error() {
        let err = DomainError::parse("Unknown phase: Stretch");
        assert_eq!(err.to_string(), "Parse error: Unknown phase: Stretch");
    }
}
