//! Concurrent helpers.
//!
//! `map` and `parallel` are thin layers over [`corral_core::run_bounded`].
//! `race` starts every invocation and settles with the first one to finish;
//! the rest keep running detached, like any other started work.

use std::future::Future;
use std::panic;

use futures_util::stream::{FuturesUnordered, StreamExt};

use corral_core::run_bounded;
use corral_types::Concurrency;

/// Transform every item with at most `concurrency` invocations in flight.
///
/// Results are in input order. See [`run_bounded`].
pub async fn map<T, R, E, F, Fut>(
    values: Vec<T>,
    transform: F,
    concurrency: Option<Concurrency>,
) -> Result<Vec<R>, E>
where
    F: FnMut(T, usize) -> Fut,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: Send + 'static,
    E: Send + 'static,
{
    run_bounded(values, transform, concurrency).await
}

/// Run `handler` for every item for its side effects.
pub async fn parallel<T, E, F, Fut>(
    values: Vec<T>,
    handler: F,
    concurrency: Option<Concurrency>,
) -> Result<(), E>
where
    F: FnMut(T, usize) -> Fut,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Send + 'static,
{
    run_bounded(values, handler, concurrency).await.map(drop)
}

/// Start every invocation and settle with whichever finishes first.
///
/// The first outcome wins whether it is `Ok` or `Err`. Empty input yields
/// `Ok(None)`.
pub async fn race<T, R, E, F, Fut>(values: Vec<T>, mut transform: F) -> Result<Option<R>, E>
where
    F: FnMut(T, usize) -> Fut,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: Send + 'static,
    E: Send + 'static,
{
    let mut running: FuturesUnordered<_> = values
        .into_iter()
        .enumerate()
        .map(|(index, value)| tokio::spawn(transform(value, index)))
        .collect();
    tracing::debug!(contenders = running.len(), "Starting race");

    match running.next().await {
        None => Ok(None),
        Some(Ok(outcome)) => outcome.map(Some),
        Some(Err(err)) => match err.try_into_panic() {
            Ok(payload) => panic::resume_unwind(payload),
            // Contenders are never aborted; shutdown drops this race first.
            Err(err) => unreachable!("race contender was cancelled: {err}"),
        },
    }
}
