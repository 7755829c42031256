//! Store-level failures and their translation into domain errors.

use thiserror::Error;

use catalog_core::DomainError;

/// Store operation error.
///
/// These are **infrastructure errors** (storage, connectivity, constraint
/// violations) as opposed to domain errors (validation, missing references).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A unique index/constraint rejected the write.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Anything else: connectivity, poisoned locks, malformed rows.
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub(crate) fn poisoned() -> Self {
        Self::Backend("lock poisoned".to_string())
    }
}

impl From<StoreError> for DomainError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::UniqueViolation(msg) => DomainError::Conflict(msg),
            StoreError::Backend(msg) => DomainError::Store(msg),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                // PostgreSQL unique_violation
                if db_err.code().as_deref() == Some("23505") {
                    let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                    StoreError::UniqueViolation(constraint)
                } else {
                    StoreError::Backend(format!("database error: {}", db_err.message()))
                }
            }
            sqlx::Error::PoolClosed => StoreError::backend("connection pool closed"),
            other => StoreError::Backend(format!("sqlx error: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_errors_become_store_failures() {
        let err: DomainError = StoreError::backend("connection refused").into();
        assert_eq!(err, DomainError::Store("connection refused".to_string()));
    }

    #[test]
    fn unique_violations_become_conflicts() {
        let err: DomainError = StoreError::UniqueViolation("uq_x".to_string()).into();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn pool_closed_is_a_backend_error() {
        let err = StoreError::from(sqlx::Error::PoolClosed);
        assert_eq!(err, StoreError::backend("connection pool closed"));
    }
}
