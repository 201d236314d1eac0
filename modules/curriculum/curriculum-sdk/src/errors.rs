//! Public error types for the `curriculum` module.
//!
//! These errors are safe to expose to other modules and consumers.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can be returned by `CurriculumClientV1`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurriculumError {
    /// The referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: Uuid },

    /// A uniqueness rule was violated (duplicate username, second credit account, ...).
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Validation error with the provided data.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// A debit larger than the available balance.
    #[error("Insufficient credits for user {user_id}: balance {balance}, requested {requested}")]
    InsufficientCredits {
        user_id: Uuid,
        balance: i64,
        requested: i64,
    },

    /// An internal error occurred.
    #[error("Internal error")]
    Internal,
}

impl CurriculumError {
    pub fn not_found(entity: impl Into<String>, id: Uuid) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::Internal
    }
}
