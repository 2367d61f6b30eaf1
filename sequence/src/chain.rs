//! Chainable composition over a future collection.
//!
//! ```ignore
//! let doubled = chainable::<_, String>(vec![1, 2, 3])
//!     .filter(|value, _| { let keep = *value != 2; async move { Ok(keep) } })
//!     .map(|value, _| async move { Ok(value * 2) }, None)
//!     .await?;
//! assert_eq!(doubled, vec![2, 6]);
//! ```
//!
//! Steps that produce a collection (`filter`, `map`, `reduce_into_vec`)
//! return another [`Chain`]. Steps that produce anything else are terminal
//! and return a plain future. Nothing runs until the chain is awaited.

use std::fmt;
use std::future::{Future, IntoFuture};
use std::ops::ControlFlow;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;

use corral_core::run_bounded;
use corral_types::Concurrency;

use crate::{concurrent, sequential};

/// A pending collection that further steps can be chained onto.
pub struct Chain<T, E> {
    values: BoxFuture<'static, Result<Vec<T>, E>>,
}

/// Start a chain from a ready collection.
pub fn chainable<T, E>(values: Vec<T>) -> Chain<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    Chain::from_future(async move { Ok(values) })
}

impl<T, E> Chain<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Start a chain from a collection that is still being produced.
    pub fn from_future<Fut>(values: Fut) -> Self
    where
        Fut: Future<Output = Result<Vec<T>, E>> + Send + 'static,
    {
        Self {
            values: values.boxed(),
        }
    }

    pub fn filter<F, Fut>(self, predicate: F) -> Self
    where
        F: FnMut(&T, usize) -> Fut + Send + 'static,
        Fut: Future<Output = Result<bool, E>> + Send + 'static,
    {
        let values = self.values;
        Self::from_future(async move { sequential::filter(values.await?, predicate).await })
    }

    pub fn map<R, F, Fut>(self, transform: F, concurrency: Option<Concurrency>) -> Chain<R, E>
    where
        R: Send + 'static,
        F: FnMut(T, usize) -> Fut + Send + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
    {
        let values = self.values;
        Chain::from_future(async move { run_bounded(values.await?, transform, concurrency).await })
    }

    /// Fold into a new collection and keep chaining on it.
    pub fn reduce_into_vec<U, F, Fut>(self, reducer: F, initial: Vec<U>) -> Chain<U, E>
    where
        U: Send + 'static,
        F: FnMut(Vec<U>, T, usize) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<U>, E>> + Send + 'static,
    {
        let values = self.values;
        Chain::from_future(
            async move { sequential::reduce(values.await?, reducer, initial).await },
        )
    }

    pub async fn each<F, Fut>(self, handler: F) -> Result<bool, E>
    where
        F: FnMut(&T, usize) -> Fut,
        Fut: Future<Output = Result<ControlFlow<()>, E>>,
    {
        let values = self.values.await?;
        sequential::each(&values, handler).await
    }

    pub async fn every<F, Fut>(self, predicate: F) -> Result<bool, E>
    where
        F: FnMut(&T, usize) -> Fut,
        Fut: Future<Output = Result<bool, E>>,
    {
        let values = self.values.await?;
        sequential::every(&values, predicate).await
    }

    pub async fn some<F, Fut>(self, predicate: F) -> Result<bool, E>
    where
        F: FnMut(&T, usize) -> Fut,
        Fut: Future<Output = Result<bool, E>>,
    {
        let values = self.values.await?;
        sequential::some(&values, predicate).await
    }

    pub async fn find<F, Fut>(self, predicate: F) -> Result<Option<T>, E>
    where
        F: FnMut(&T, usize) -> Fut,
        Fut: Future<Output = Result<bool, E>>,
    {
        sequential::find(self.values.await?, predicate).await
    }

    pub async fn find_index<F, Fut>(self, predicate: F) -> Result<Option<usize>, E>
    where
        F: FnMut(&T, usize) -> Fut,
        Fut: Future<Output = Result<bool, E>>,
    {
        let values = self.values.await?;
        sequential::find_index(&values, predicate).await
    }

    pub async fn reduce<A, F, Fut>(self, reducer: F, initial: A) -> Result<A, E>
    where
        F: FnMut(A, T, usize) -> Fut,
        Fut: Future<Output = Result<A, E>>,
    {
        sequential::reduce(self.values.await?, reducer, initial).await
    }

    pub async fn reduce_right<A, F, Fut>(self, reducer: F, initial: A) -> Result<A, E>
    where
        F: FnMut(A, T, usize) -> Fut,
        Fut: Future<Output = Result<A, E>>,
    {
        sequential::reduce_right(self.values.await?, reducer, initial).await
    }

    pub async fn fold_first<F, Fut>(self, reducer: F) -> Result<Option<T>, E>
    where
        F: FnMut(T, T, usize) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        sequential::fold_first(self.values.await?, reducer).await
    }

    pub async fn parallel<F, Fut>(self, handler: F, concurrency: Option<Concurrency>) -> Result<(), E>
    where
        F: FnMut(T, usize) -> Fut,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
    {
        concurrent::parallel(self.values.await?, handler, concurrency).await
    }

    pub async fn race<R, F, Fut>(self, transform: F) -> Result<Option<R>, E>
    where
        R: Send + 'static,
        F: FnMut(T, usize) -> Fut,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
    {
        concurrent::race(self.values.await?, transform).await
    }
}

impl<T, E> IntoFuture for Chain<T, E> {
    type Output = Result<Vec<T>, E>;
    type IntoFuture = BoxFuture<'static, Result<Vec<T>, E>>;

    fn into_future(self) -> Self::IntoFuture {
        self.values
    }
}

impl<T, E> fmt::Debug for Chain<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain").finish_non_exhaustive()
    }
}
