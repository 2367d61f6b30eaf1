//! Concurrency-control primitives for Corral.
//!
//! This crate contains the three primitives the rest of the workspace is built on:
//!
//! - **`bounded`**: run a transform over a fixed collection with an optional
//!   concurrency cap, results in input order
//! - **`keyed_lock`**: per-key FIFO mutual exclusion for async handlers
//! - **`batch`**: collect individually scheduled tasks and flush them to a
//!   handler once per time window
//!
//! None of the three depend on each other. All of them need a tokio runtime
//! (current-thread or multi-threaded).

pub mod batch;
pub mod bounded;
pub mod keyed_lock;
mod sync;

pub use batch::BatchScheduler;
pub use bounded::run_bounded;
pub use corral_types::{BatchDelay, Concurrency, ConcurrencyError, FlushError};
pub use keyed_lock::KeyedLock;
