use crate::backend::BackendError;

/// The two failure kinds a CRUD store can report.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CrudError {
    /// `update` or `remove` targeted an id the store does not hold.
    #[error("not found: {0}")]
    NotFound(String),

    /// Anything else: backend unavailable, id collision, bad data.
    #[error("operation failed: {0}")]
    OperationFailed(String),
}

impl From<BackendError> for CrudError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotFound(id) => CrudError::NotFound(id),
            other => CrudError::OperationFailed(other.to_string()),
        }
    }
}

/// Result alias for store operations.
pub type CrudResult<T> = Result<T, CrudError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_not_found_stays_not_found() {
        let err: CrudError = BackendError::NotFound("p1".into()).into();
        assert_eq!(err, CrudError::NotFound("p1".into()));
    }

    #[test]
    fn other_backend_errors_become_operation_failed() {
        let err: CrudError = BackendError::Unavailable("timeout".into()).into();
        assert_eq!(err, CrudError::OperationFailed("backend unavailable: timeout".into()));
        let err: CrudError = BackendError::Conflict("p1".into()).into();
        assert!(matches!(err, CrudError::OperationFailed(_)));
    }
}
