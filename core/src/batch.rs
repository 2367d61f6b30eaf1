//! Time-windowed batch aggregation.
//!
//! A [`BatchScheduler`] collects tasks into a buffer. The first task of a
//! buffer spawns a flush that waits for the configured delay, takes the whole
//! buffer, and hands it to the handler in one call. Every task in that buffer
//! resolves with the handler's single outcome.
//!
//! Tasks scheduled after a flush has taken its buffer start a new buffer with
//! its own flush, even if the previous handler is still running.

use std::fmt;
use std::future::Future;
use std::mem;
use std::sync::{Arc, Mutex};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};

use corral_types::{BatchDelay, FlushError};

use crate::sync::lock;

type BatchHandler<T, R, E> = Arc<dyn Fn(Vec<T>) -> BoxFuture<'static, Result<R, E>> + Send + Sync>;
type FlushOutcome<R, E> = Result<R, FlushError<E>>;
type PendingFlush<R, E> = Shared<BoxFuture<'static, FlushOutcome<R, E>>>;

struct Buffer<T, R, E> {
    tasks: Vec<T>,
    flush: Option<PendingFlush<R, E>>,
}

/// Groups individually scheduled tasks into one handler call per window.
pub struct BatchScheduler<T, R, E> {
    handler: BatchHandler<T, R, E>,
    delay: BatchDelay,
    buffer: Arc<Mutex<Buffer<T, R, E>>>,
}

impl<T, R, E> BatchScheduler<T, R, E>
where
    T: Send + 'static,
    R: Clone + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a scheduler that flushes on the next scheduling opportunity.
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(Vec<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
    {
        Self {
            handler: Arc::new(move |tasks| handler(tasks).boxed()),
            delay: BatchDelay::ZERO,
            buffer: Arc::new(Mutex::new(Buffer {
                tasks: Vec::new(),
                flush: None,
            })),
        }
    }

    /// Wait `delay` after the first task of a window before flushing.
    pub fn with_delay(mut self, delay: impl Into<BatchDelay>) -> Self {
        self.delay = delay.into();
        self
    }

    #[must_use]
    pub fn delay(&self) -> BatchDelay {
        self.delay
    }

    /// Add `task` to the current window.
    ///
    /// The task is buffered when this method is called; the returned future
    /// only observes the outcome. Dropping it does not remove the task from
    /// its batch. It resolves once the flush containing `task` settles, with
    /// the value or error shared by the whole batch.
    pub fn schedule(&self, task: T) -> impl Future<Output = FlushOutcome<R, E>> + use<T, R, E> {
        let mut buffer = lock(&self.buffer);
        buffer.tasks.push(task);

        if let Some(flush) = &buffer.flush {
            return flush.clone();
        }

        let flush = self.spawn_flush();
        buffer.flush = Some(flush.clone());
        flush
    }

    /// Number of tasks waiting for the next flush to take them.
    #[must_use]
    pub fn pending(&self) -> usize {
        lock(&self.buffer).tasks.len()
    }

    fn spawn_flush(&self) -> PendingFlush<R, E> {
        let buffer = Arc::clone(&self.buffer);
        let handler = Arc::clone(&self.handler);
        let delay = self.delay;

        let flush = tokio::spawn(async move {
            if delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(delay.as_duration()).await;
            }

            let tasks = {
                let mut buffer = lock(&buffer);
                buffer.flush = None;
                mem::take(&mut buffer.tasks)
            };
            tracing::debug!(tasks = tasks.len(), "Flushing batch");
            handler(tasks).await
        });

        flush
            .map(|joined| match joined {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(err)) => Err(FlushError::Handler(Arc::new(err))),
                Err(err) => {
                    tracing::debug!(%err, "Batch flush aborted");
                    Err(FlushError::Aborted)
                }
            })
            .boxed()
            .shared()
    }
}

impl<T, R, E> fmt::Debug for BatchScheduler<T, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buffer = lock(&self.buffer);
        f.debug_struct("BatchScheduler")
            .field("delay", &self.delay)
            .field("pending", &buffer.tasks.len())
            .field("flush_pending", &buffer.flush.is_some())
            .finish_non_exhaustive()
    }
}
