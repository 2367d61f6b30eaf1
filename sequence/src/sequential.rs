//! Sequential helpers.
//!
//! Each helper awaits one handler before calling the next. Handlers are
//! called with a borrowed item, so a handler that needs the item inside its
//! future copies what it needs before returning it.

use std::future::Future;
use std::ops::ControlFlow;

/// Visit items left to right. `ControlFlow::Break` stops the walk.
///
/// Returns `Ok(true)` when every item was visited, `Ok(false)` when a
/// handler broke out early.
pub async fn each<T, E, F, Fut>(values: &[T], mut handler: F) -> Result<bool, E>
where
    F: FnMut(&T, usize) -> Fut,
    Fut: Future<Output = Result<ControlFlow<()>, E>>,
{
    for (index, value) in values.iter().enumerate() {
        if handler(value, index).await?.is_break() {
            return Ok(false);
        }
    }
    Ok(true)
}

/// [`each`], right to left.
pub async fn each_right<T, E, F, Fut>(values: &[T], mut handler: F) -> Result<bool, E>
where
    F: FnMut(&T, usize) -> Fut,
    Fut: Future<Output = Result<ControlFlow<()>, E>>,
{
    for (index, value) in values.iter().enumerate().rev() {
        if handler(value, index).await?.is_break() {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Whether any item satisfies `predicate`. Stops at the first match.
pub async fn some<T, E, F, Fut>(values: &[T], mut predicate: F) -> Result<bool, E>
where
    F: FnMut(&T, usize) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    for (index, value) in values.iter().enumerate() {
        if predicate(value, index).await? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Whether every item satisfies `predicate`. Stops at the first miss.
pub async fn every<T, E, F, Fut>(values: &[T], mut predicate: F) -> Result<bool, E>
where
    F: FnMut(&T, usize) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    for (index, value) in values.iter().enumerate() {
        if !predicate(value, index).await? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Index of the first item satisfying `predicate`.
pub async fn find_index<T, E, F, Fut>(values: &[T], mut predicate: F) -> Result<Option<usize>, E>
where
    F: FnMut(&T, usize) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    for (index, value) in values.iter().enumerate() {
        if predicate(value, index).await? {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

/// First item satisfying `predicate`.
pub async fn find<T, E, F, Fut>(values: Vec<T>, mut predicate: F) -> Result<Option<T>, E>
where
    F: FnMut(&T, usize) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    for (index, value) in values.into_iter().enumerate() {
        let matched = predicate(&value, index);
        if matched.await? {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

/// Items satisfying `predicate`, in their original order.
pub async fn filter<T, E, F, Fut>(values: Vec<T>, mut predicate: F) -> Result<Vec<T>, E>
where
    F: FnMut(&T, usize) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let mut kept = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        let keep = predicate(&value, index);
        if keep.await? {
            kept.push(value);
        }
    }
    Ok(kept)
}

/// Fold items left to right starting from `initial`.
pub async fn reduce<T, A, E, F, Fut>(values: Vec<T>, mut reducer: F, initial: A) -> Result<A, E>
where
    F: FnMut(A, T, usize) -> Fut,
    Fut: Future<Output = Result<A, E>>,
{
    let mut acc = initial;
    for (index, value) in values.into_iter().enumerate() {
        acc = reducer(acc, value, index).await?;
    }
    Ok(acc)
}

/// Fold items right to left starting from `initial`.
pub async fn reduce_right<T, A, E, F, Fut>(
    values: Vec<T>,
    mut reducer: F,
    initial: A,
) -> Result<A, E>
where
    F: FnMut(A, T, usize) -> Fut,
    Fut: Future<Output = Result<A, E>>,
{
    let mut acc = initial;
    for (index, value) in values.into_iter().enumerate().rev() {
        acc = reducer(acc, value, index).await?;
    }
    Ok(acc)
}

/// Fold items left to right using the first item as the initial value.
///
/// The reducer first sees index 1. Empty input yields `Ok(None)`.
pub async fn fold_first<T, E, F, Fut>(values: Vec<T>, reducer: F) -> Result<Option<T>, E>
where
    F: FnMut(T, T, usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    fold_from_first(values.into_iter().enumerate(), reducer).await
}

/// Fold items right to left using the last item as the initial value.
pub async fn fold_first_right<T, E, F, Fut>(values: Vec<T>, reducer: F) -> Result<Option<T>, E>
where
    F: FnMut(T, T, usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    fold_from_first(values.into_iter().enumerate().rev(), reducer).await
}

async fn fold_from_first<T, E, I, F, Fut>(mut items: I, mut reducer: F) -> Result<Option<T>, E>
where
    I: Iterator<Item = (usize, T)>,
    F: FnMut(T, T, usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let Some((_, mut acc)) = items.next() else {
        return Ok(None);
    };
    for (index, value) in items {
        acc = reducer(acc, value, index).await?;
    }
    Ok(Some(acc))
}
