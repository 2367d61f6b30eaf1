//! Adapters from completion signals to futures.
//!
//! - **`callback`**: drive callback-style APIs and await their result
//! - **`awaitable`**: await a child process exit or a matching event on a stream
//!
//! These adapters carry no concurrency control of their own; their futures
//! are what callers feed into the `corral-core` primitives.

pub mod awaitable;
pub mod callback;

pub use awaitable::{EventError, ProcessError};
pub use callback::{CallError, Callback, call};
