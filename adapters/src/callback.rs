//! Callback-to-future adapter.
//!
//! [`call`] hands a one-shot [`Callback`] to a callback-style function and
//! returns a future for whatever the callback is completed with.

use std::future::Future;

use thiserror::Error;
use tokio::sync::oneshot;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CallError<E> {
    #[error("callback reported failure: {0}")]
    Failed(E),
    #[error("callback was dropped without being completed")]
    Dropped,
}

/// One-shot completion handle passed to a callback-style function.
#[derive(Debug)]
pub struct Callback<T, E> {
    sender: oneshot::Sender<Result<T, E>>,
}

impl<T, E> Callback<T, E> {
    /// Settle the pending call. Ignored if the caller stopped waiting.
    pub fn complete(self, outcome: Result<T, E>) {
        if self.sender.send(outcome).is_err() {
            tracing::trace!("Callback completed after its caller went away");
        }
    }

    pub fn succeed(self, value: T) {
        self.complete(Ok(value));
    }

    pub fn fail(self, error: E) {
        self.complete(Err(error));
    }

    /// Convert into a plain closure for APIs that take `FnOnce(Result<T, E>)`.
    pub fn into_fn(self) -> impl FnOnce(Result<T, E>) {
        move |outcome| self.complete(outcome)
    }
}

/// Invoke `f` with a fresh [`Callback`] and await its completion.
///
/// `f` runs immediately, before the returned future is polled. If `f` drops
/// the callback without completing it, the future resolves to
/// [`CallError::Dropped`].
pub fn call<T, E, F>(f: F) -> impl Future<Output = Result<T, CallError<E>>>
where
    F: FnOnce(Callback<T, E>),
{
    let (sender, receiver) = oneshot::channel();
    f(Callback { sender });

    async move {
        match receiver.await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(CallError::Failed(err)),
            Err(_) => Err(CallError::Dropped),
        }
    }
}
