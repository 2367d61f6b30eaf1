use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Outcome shared by every task of a failed batch flush.
///
/// The handler's error is reference-counted so one failure can be handed to
/// every task that was part of the batch without requiring `E: Clone`.
#[derive(Error)]
pub enum FlushError<E> {
    /// The handler ran and returned this error for the whole batch.
    #[error("batch handler failed: {0}")]
    Handler(Arc<E>),
    /// The flush task ended without producing an outcome (panic or runtime shutdown).
    #[error("batch flush aborted before its handler settled")]
    Aborted,
}

impl<E> FlushError<E> {
    /// The handler's error, if the handler ran and failed.
    #[must_use]
    pub fn handler_error(&self) -> Option<&E> {
        match self {
            Self::Handler(err) => Some(err),
            Self::Aborted => None,
        }
    }
}

impl<E> Clone for FlushError<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Handler(err) => Self::Handler(Arc::clone(err)),
            Self::Aborted => Self::Aborted,
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for FlushError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handler(err) => f.debug_tuple("Handler").field(err).finish(),
            Self::Aborted => f.write_str("Aborted"),
        }
    }
}

impl<E: PartialEq> PartialEq for FlushError<E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Handler(a), Self::Handler(b)) => a == b,
            (Self::Aborted, Self::Aborted) => true,
            _ => false,
        }
    }
}
