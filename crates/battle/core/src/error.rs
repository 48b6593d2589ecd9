//! Common error infrastructure for battle-core.
//!
//! This module provides shared types and traits used across all error types in
//! battle-core. Domain-specific errors (e.g., `PlanningError`, `RngError`) are
//! defined in their respective modules alongside the operations they validate.
//!
//! Two failure shapes exist:
//!
//! - **Contract violations** on engine operations (wrong phase, bad index,
//!   insufficient mana). These are returned as typed enums implementing
//!   [`BattleError`] and never mutate the input state.
//! - **Structural violations** on untrusted data (saves, externally built
//!   states, encounter tables). These are collected into [`ValidationErrors`]
//!   so callers can enumerate every problem at once.

use std::fmt;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// Errors are classified by their recoverability and expected handling:
/// - **Recoverable**: The caller can retry with different input (e.g., cheaper ability)
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: Data-integrity failures, the battle cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative input.
    ///
    /// Examples: not enough mana, djinn not ready
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unit index out of range, unknown ability
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: queued action references a unit missing from the roster
    Internal,

    /// Fatal error - upstream data is corrupt.
    ///
    /// Examples: encounter id missing from the content catalog
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all battle-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait BattleError: fmt::Display + fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// This is useful for error categorization, metrics, and testing.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// A single structural problem found in untrusted data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `playerTeam.units[2].level`.
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Ordered collection of validation failures.
///
/// Validators push every problem they find instead of stopping at the first,
/// then convert the collector into a `Result` with [`ValidationErrors::into_result`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a problem at `path`.
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationError::new(path, message));
    }

    /// Appends every error of `other`, prefixing paths with `prefix`.
    pub fn extend_prefixed(&mut self, prefix: &str, other: ValidationErrors) {
        for error in other.errors {
            let path = if error.path.is_empty() {
                prefix.to_string()
            } else if error.path.starts_with('[') {
                format!("{prefix}{}", error.path)
            } else {
                format!("{prefix}.{}", error.path)
            };
            self.errors.push(ValidationError::new(path, error.message));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// Returns true if any recorded error points at exactly `path`.
    pub fn contains_path(&self, path: &str) -> bool {
        self.errors.iter().any(|e| e.path == path)
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{} validation error(s): {joined}", self.errors.len())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl BattleError for ValidationErrors {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "VALIDATION_FAILED"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_joins_every_error_in_order() {
        let mut errors = ValidationErrors::new();
        errors.push("roundNumber", "must be at least 1");
        errors.push("queuedActions", "length 3 does not match team size 4");

        let report = errors.to_string();
        assert_eq!(
            report,
            "2 validation error(s): roundNumber: must be at least 1; \
             queuedActions: length 3 does not match team size 4"
        );
    }

    #[test]
    fn prefixed_paths_handle_indices_and_fields() {
        let mut inner = ValidationErrors::new();
        inner.push("level", "out of range");
        inner.push("[0]", "unknown id");

        let mut outer = ValidationErrors::new();
        outer.extend_prefixed("units[1]", inner);

        assert!(outer.contains_path("units[1].level"));
        assert!(outer.contains_path("units[1][0]"));
    }

    #[test]
    fn empty_collector_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
        assert_eq!(ErrorSeverity::Fatal.as_str(), "fatal");
        assert!(ErrorSeverity::Internal.is_internal());
        assert!(!ErrorSeverity::Validation.is_recoverable());
    }
}
