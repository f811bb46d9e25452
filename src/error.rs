// Error taxonomy for ledger operations
// Every error is local to one call: a refused operation leaves the state untouched.

use crate::friend::FriendId;
use thiserror::Error;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A rejected input, scoped to the field that caused it
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        Self::new(field, "Required field is empty")
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// LEDGER ERROR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Input failed validation (empty name, negative amount, ...)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A bill split was requested with no friend selected
    #[error("No friend selected")]
    NoSelection,

    /// The id does not belong to any friend in the ledger
    #[error("Unknown friend id: {0}")]
    InvalidReference(FriendId),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation(_))
    }

    /// Short machine-readable code, used by the HTTP layer
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::Validation(_) => "validation",
            LedgerError::NoSelection => "no_selection",
            LedgerError::InvalidReference(_) => "invalid_reference",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::required("name");
        assert_eq!(err.to_string(), "name: Required field is empty");

        let wrapped: LedgerError = err.into();
        assert!(wrapped.is_validation());
        assert_eq!(wrapped.to_string(), "Validation error: name: Required field is empty");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::NoSelection.code(), "no_selection");
        assert_eq!(
            LedgerError::InvalidReference(FriendId::from("42")).to_string(),
            "Unknown friend id: 42"
        );
        assert_eq!(
            LedgerError::InvalidReference(FriendId::from("42")).code(),
            "invalid_reference"
        );
    }
}
