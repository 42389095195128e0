// src/types.rs
//! Domain-specific newtypes for type safety and validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid Drive folder id: {reason}")]
    InvalidFolderId { reason: String },
}

/// Identifier of the Google Drive folder that receives every upload.
///
/// Drive hands these out as opaque URL-safe strings; the only invariants
/// this type enforces are "non-empty" and "no whitespace", which catches
/// the common copy-paste accidents before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(String);

impl FolderId {
    /// Create a new folder id with validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();

        if id.is_empty() {
            return Err(ValidationError::InvalidFolderId {
                reason: "folder id cannot be empty".to_string(),
            });
        }

        if id.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidFolderId {
                reason: "folder id cannot contain whitespace".to_string(),
            });
        }

        Ok(Self(id))
    }

    /// Get the folder id as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
