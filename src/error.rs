//! Error types for mapping and statement operations.
//!
//! This module provides the `DockError` enum shared by the statement builder
//! family, the JSON serializer, and the type handler registry.

use crate::executor::StorageError;
use crate::value::ValueKind;

/// Error type for mapping operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockError {
    /// No registered type handler claims the given kind
    NoHandler(ValueKind),
    /// A value conversion failed for a specific field or argument
    Conversion { key: String, message: String },
    /// A required JSON key (or one of its ancestors) is absent
    RequiredKeyMissing(String),
    /// The JSON document has an unexpected shape (non-object at a nested segment)
    Document(String),
    /// The storage collaborator reported a failure
    Storage(StorageError),
}

impl DockError {
    /// Shorthand for a [`DockError::Conversion`] naming the offending key.
    pub fn conversion(key: impl Into<String>, message: impl Into<String>) -> Self {
        DockError::Conversion {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for DockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DockError::NoHandler(kind) => {
                write!(f, "No type handler registered for {:?}", kind)
            }
            DockError::Conversion { key, message } => {
                write!(f, "Failed to convert '{}': {}", key, message)
            }
            DockError::RequiredKeyMissing(key) => {
                write!(f, "Required key '{}' not present", key)
            }
            DockError::Document(msg) => {
                write!(f, "Malformed document: {}", msg)
            }
            DockError::Storage(err) => {
                write!(f, "Storage error: {}", err)
            }
        }
    }
}

impl std::error::Error for DockError {}

impl From<StorageError> for DockError {
    fn from(err: StorageError) -> Self {
        DockError::Storage(err)
    }
}
