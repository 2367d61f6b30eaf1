//! Async collection helpers for Corral.
//!
//! - **`sequential`**: one handler at a time, left to right (or right to left
//!   for the `_right` variants), stopping early where the operation allows
//! - **`concurrent`**: `map`/`parallel` on top of the bounded runner, and `race`
//! - **`chain`**: a wrapper that threads a future collection through
//!   successive operations
//!
//! Handlers receive the item and its index and return a `Result`; the first
//! `Err` ends the operation and is returned to the caller.

pub mod chain;
pub mod concurrent;
pub mod sequential;

pub use chain::{Chain, chainable};
pub use concurrent::{map, parallel, race};
pub use sequential::{
    each, each_right, every, filter, find, find_index, fold_first, fold_first_right, reduce,
    reduce_right, some,
};
