//! Core domain types for Corral.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the workspace.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod flush;
mod limits;

pub use flush::FlushError;
pub use limits::{BatchDelay, Concurrency, ConcurrencyError};
