//! Input validation errors.
//!
//! Every constructor and parser in this crate reports problems through
//! [`ValidationError`], so front ends can surface a single human-readable
//! message regardless of which field was wrong.

use thiserror::Error;

/// Work order validation errors.
///
/// Each variant describes a specific problem with user-supplied input. The
/// `Display` impl provides a message suitable for printing as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Machine identifier is empty or whitespace-only.
    #[error("machine id is required")]
    EmptyMachineId,
    /// Issue description is empty or whitespace-only.
    #[error("issue is required")]
    EmptyIssue,
    /// Priority is not one of `low`, `med`, `high`.
    #[error("invalid priority '{0}': expected one of low, med, high")]
    InvalidPriority(String),
    /// Status is not one of `open`, `closed`.
    #[error("invalid status '{0}': expected one of open, closed")]
    InvalidStatus(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_value() {
        assert_eq!(
            ValidationError::InvalidPriority("urgent".into()).to_string(),
            "invalid priority 'urgent': expected one of low, med, high"
        );
        assert_eq!(
            ValidationError::InvalidStatus("pending".into()).to_string(),
            "invalid status 'pending': expected one of open, closed"
        );
    }

    #[test]
    fn test_required_field_messages() {
        assert_eq!(ValidationError::EmptyMachineId.to_string(), "machine id is required");
        assert_eq!(ValidationError::EmptyIssue.to_string(), "issue is required");
    }
}
