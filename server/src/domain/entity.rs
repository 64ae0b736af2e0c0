//! Domain Layer - Entities and Errors
//!
//! Lists and items are identified by SQLite row ids. Validation errors
//! carry the exact sentence shown under the item input.

use std::fmt;

/// A persisted row with a stable id
pub trait Entity: Sized + Send + Sync + Clone {
    type Id: Copy + Eq + std::hash::Hash + Send + Sync + fmt::Display;

    fn id(&self) -> Self::Id;
}

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No list or item with the requested id
    NotFound(String),
    /// Rejected item text, e.g. blank
    InvalidInput(String),
    /// Item text already present in the list
    Conflict(String),
    /// Storage failure; never shown to visitors
    Internal(String),
}

impl DomainError {
    /// Message rendered back into the form, for validation failures only
    pub fn form_message(&self) -> Option<&str> {
        match self {
            DomainError::InvalidInput(msg) | DomainError::Conflict(msg) => Some(msg),
            DomainError::NotFound(_) | DomainError::Internal(_) => None,
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::InvalidInput(msg) | DomainError::Conflict(msg) => f.write_str(msg),
            DomainError::NotFound(what) => write!(f, "not found: {}", what),
            DomainError::Internal(detail) => write!(f, "storage error: {}", detail),
        }
    }
}

impl std::error::Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_message_only_for_validation() {
        let empty = DomainError::InvalidInput("You can't have an empty list item".into());
        assert_eq!(empty.form_message(), Some("You can't have an empty list item"));
        assert_eq!(empty.to_string(), "You can't have an empty list item");
        assert!(DomainError::NotFound("list 3".into()).form_message().is_none());
        assert!(DomainError::Internal("disk full".into()).form_message().is_none());
    }
}
