//! Bounded-concurrency runner.
//!
//! `run_bounded` maps a transform over an ordered collection while keeping at
//! most `Concurrency` invocations in flight. Results come back in input order
//! no matter which invocation settles first.
//!
//! Each invocation is spawned onto the runtime. When one fails, the run
//! returns that error right away and launches nothing else; invocations that
//! already started are detached and finish in the background.

use std::future::Future;
use std::panic;

use futures_util::FutureExt;
use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio::task::JoinError;

use corral_types::Concurrency;

/// Run `transform` over `items` with at most `concurrency` invocations in flight.
///
/// `None` starts every invocation immediately. The transform receives each
/// item together with its index and is called in index order.
///
/// An empty input resolves to an empty vector without calling the transform.
/// A panicking invocation is re-raised on the caller.
pub async fn run_bounded<T, R, E, F, Fut>(
    items: Vec<T>,
    mut transform: F,
    concurrency: Option<Concurrency>,
) -> Result<Vec<R>, E>
where
    F: FnMut(T, usize) -> Fut,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: Send + 'static,
    E: Send + 'static,
{
    let total = items.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let width = concurrency.map_or(total, |limit| limit.window(total));
    tracing::debug!(total, width, "Starting bounded run");

    let mut cursor = items.into_iter().enumerate();
    let mut in_flight = FuturesUnordered::new();
    let mut slots: Vec<Option<R>> = Vec::with_capacity(total);
    slots.resize_with(total, || None);

    for (index, item) in cursor.by_ref().take(width) {
        in_flight.push(spawn_indexed(index, transform(item, index)));
    }

    while let Some((index, joined)) = in_flight.next().await {
        match settle(index, joined) {
            Ok(value) => slots[index] = Some(value),
            Err(err) => {
                tracing::trace!(
                    index,
                    detached = in_flight.len(),
                    "Bounded run failed; remaining invocations detached"
                );
                return Err(err);
            }
        }

        if let Some((next, item)) = cursor.next() {
            in_flight.push(spawn_indexed(next, transform(item, next)));
        }
    }

    let results: Vec<R> = slots.into_iter().flatten().collect();
    debug_assert_eq!(results.len(), total);
    Ok(results)
}

/// Spawn one invocation, tagging its join result with the input index.
fn spawn_indexed<Fut, R, E>(
    index: usize,
    invocation: Fut,
) -> impl Future<Output = (usize, Result<Result<R, E>, JoinError>)>
where
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: Send + 'static,
    E: Send + 'static,
{
    tokio::spawn(invocation).map(move |joined| (index, joined))
}

fn settle<R, E>(index: usize, joined: Result<Result<R, E>, JoinError>) -> Result<R, E> {
    match joined {
        Ok(outcome) => outcome,
        Err(err) => match err.try_into_panic() {
            Ok(payload) => panic::resume_unwind(payload),
            // Invocation handles are never aborted, and runtime shutdown
            // drops the task polling this run before it can observe a
            // cancelled invocation.
            Err(err) => unreachable!("bounded run invocation {index} was cancelled: {err}"),
        },
    }
}
