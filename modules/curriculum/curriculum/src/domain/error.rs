use curriculum_sdk::CurriculumError;
use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Integrity violation: {message}")]
    Integrity { message: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Insufficient credits for user {user_id}: balance {balance}, requested {requested}")]
    InsufficientCredits {
        user_id: Uuid,
        balance: i64,
        requested: i64,
    },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn insufficient_credits(user_id: Uuid, balance: i64, requested: i64) -> Self {
        Self::InsufficientCredits {
            user_id,
            balance,
            requested,
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<DomainError> for CurriculumError {
    fn from(domain_error: DomainError) -> Self {
        match domain_error {
            DomainError::NotFound { entity, id } => CurriculumError::not_found(entity, id),
            DomainError::Conflict { message } => CurriculumError::conflict(message),
            DomainError::Integrity { message } => CurriculumError::validation(message),
            DomainError::Validation { field, message } => {
                CurriculumError::validation(format!("{field}: {message}"))
            }
            DomainError::InsufficientCredits {
                user_id,
                balance,
                requested,
            } => CurriculumError::InsufficientCredits {
                user_id,
                balance,
                requested,
            },
            DomainError::Database { message } => {
                tracing::error!(%message, "database error surfaced to client");
                CurriculumError::internal()
            }
        }
    }
}
