//! Service error taxonomy.

use thiserror::Error;

use crate::store::StoreError;

/// Errors returned by a [`TodoService`](crate::todo::TodoService).
///
/// Store errors pass through untouched; decorators never wrap or rewrite them.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller input rejected before the store is consulted.
    #[error("{operation}: {reason}")]
    InvalidArgument {
        operation: &'static str,
        reason: String,
    },

    /// Anything the store reported, including a missing record.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Coarse classification used by transports and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    StoreFailure,
}

impl ServiceError {
    pub fn invalid_argument(operation: &'static str, reason: impl Into<String>) -> Self {
        ServiceError::InvalidArgument {
            operation,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            ServiceError::Store(StoreError::NotFound { .. }) => ErrorKind::NotFound,
            ServiceError::Store(_) => ErrorKind::StoreFailure,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
