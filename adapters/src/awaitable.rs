//! Event-source-to-future adapters.
//!
//! - [`process`] / [`run`]: a child process as a future that succeeds on exit
//!   status 0
//! - [`event`]: the first matching item of an event stream, rejecting on the
//!   first error item
//! - [`event_with_errors`]: like [`event`], but also rejecting on errors from
//!   extra error-only sources

use std::io;

use futures_util::stream::{self, Stream, StreamExt};
use thiserror::Error;
use tokio::process::{Child, Command};

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to run child process: {0}")]
    Io(#[from] io::Error),
    #[error("invalid exit code {0}")]
    ExitCode(i32),
    #[error("process terminated by signal")]
    Signaled,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError<E> {
    #[error("event source reported an error: {0}")]
    Source(E),
    #[error("event source ended before a matching event arrived")]
    Ended,
}

/// Wait for `child` to exit. Exit status 0 is success.
pub async fn process(mut child: Child) -> Result<(), ProcessError> {
    let status = child.wait().await?;
    if status.success() {
        return Ok(());
    }
    match status.code() {
        Some(code) => Err(ProcessError::ExitCode(code)),
        None => Err(ProcessError::Signaled),
    }
}

/// Spawn `command` and wait for it with [`process`].
///
/// A spawn failure is reported as [`ProcessError::Io`].
pub async fn run(command: &mut Command) -> Result<(), ProcessError> {
    let child = command.spawn()?;
    tracing::trace!(pid = child.id(), "Spawned child process");
    process(child).await
}

/// Resolve with the first item for which `matches` returns true.
///
/// An `Err` item rejects immediately. A stream that ends first yields
/// [`EventError::Ended`].
pub async fn event<S, V, E, P>(events: S, mut matches: P) -> Result<V, EventError<E>>
where
    S: Stream<Item = Result<V, E>>,
    P: FnMut(&V) -> bool,
{
    let mut events = std::pin::pin!(events);
    while let Some(item) = events.next().await {
        match item {
            Ok(value) if matches(&value) => return Ok(value),
            Ok(_) => {}
            Err(err) => return Err(EventError::Source(err)),
        }
    }
    Err(EventError::Ended)
}

/// [`event`], additionally rejecting on the first error from any of
/// `error_sources`.
///
/// Only the end of `events` counts as [`EventError::Ended`]; error sources
/// that end are simply no longer listened to.
pub async fn event_with_errors<S, X, V, E, P>(
    events: S,
    error_sources: Vec<X>,
    mut matches: P,
) -> Result<V, EventError<E>>
where
    S: Stream<Item = Result<V, E>>,
    X: Stream<Item = E> + Unpin,
    P: FnMut(&V) -> bool,
{
    // `None` marks the end of the primary stream.
    let primary = events
        .map(Some)
        .chain(stream::once(async { None }));
    let errors = stream::select_all(error_sources).map(|err| Some(Err(err)));
    let mut merged = std::pin::pin!(stream::select(primary, errors));

    while let Some(item) = merged.next().await {
        match item {
            Some(Ok(value)) if matches(&value) => return Ok(value),
            Some(Ok(_)) => {}
            Some(Err(err)) => return Err(EventError::Source(err)),
            None => break,
        }
    }
    Err(EventError::Ended)
}
