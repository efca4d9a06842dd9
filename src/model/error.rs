use thiserror::Error;

use crate::model::UserRole;

pub type DatabaseResult<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("sqlx migrate error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("sqlx error: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("role mismatch: expected {expected}, got {actual}")]
    RoleMismatch { expected: UserRole, actual: UserRole },
}

impl DatabaseError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    fn store_error(&self) -> Option<&dyn sqlx::error::DatabaseError> {
        match self {
            Self::SqlxError(sqlx::Error::Database(e)) => Some(e.as_ref()),
            _ => None,
        }
    }

    /// Duplicate email, duplicate (student, lesson) progress pair, ...
    pub fn is_unique_violation(&self) -> bool {
        self.store_error().is_some_and(|e| e.is_unique_violation())
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        self.store_error()
            .is_some_and(|e| e.is_foreign_key_violation())
    }

    pub fn is_check_violation(&self) -> bool {
        self.store_error().is_some_and(|e| e.is_check_violation())
    }

    /// Errors caused by the submitted data rather than by the store itself.
    pub fn is_rejected_input(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::RoleMismatch { .. })
            || self.is_foreign_key_violation()
            || self.is_check_violation()
    }
}

/// A stored or submitted string that names no known variant.
#[derive(Debug, Error)]
#[error("unknown {kind}: `{value}`")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    pub fn new<S: Into<String>>(kind: &'static str, value: S) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn validation_is_rejected_input_but_not_a_conflict() {
        let err = DatabaseError::validation("name must not be empty");
        assert!(err.is_rejected_input());
        assert!(!err.is_unique_violation());
        assert_eq!(err.to_string(), "validation error: name must not be empty");
    }

    #[test]
    fn role_mismatch_message() {
        let err = DatabaseError::RoleMismatch {
            expected: UserRole::Instructor,
            actual: UserRole::Student,
        };
        assert!(err.is_rejected_input());
        assert_eq!(
            err.to_string(),
            "role mismatch: expected instructor, got student"
        );
    }

    #[test]
    fn row_not_found_is_not_classified() {
        let err = DatabaseError::from(sqlx::Error::RowNotFound);
        assert!(!err.is_unique_violation());
        assert!(!err.is_foreign_key_violation());
        assert!(!err.is_check_violation());
        assert!(!err.is_rejected_input());
    }
}
