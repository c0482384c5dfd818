// Copyright 2023 Remi Bernotavicius

use thiserror::Error;

/// Failures surfaced to the caller in the same request/response cycle.
/// Nothing here is retried.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("{0}")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Database(#[from] diesel::result::Error),

    #[error(transparent)]
    Connection(#[from] diesel::result::ConnectionError),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Remaps a unique-constraint violation from the storage layer into a
/// conflict. The unique index, not a pre-check, is what closes the race
/// between concurrent inserts of the same pair.
pub fn conflict_on_unique(error: diesel::result::Error, message: &str) -> Error {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            Error::Conflict(message.into())
        }
        other => other.into(),
    }
}
