//! Resource limit types.
//!
//! These types make invalid limits unrepresentable: a `Concurrency` of zero
//! cannot be constructed, so the runner never has to decide what "run zero
//! things at a time" means.

use std::fmt;
use std::num::NonZeroUsize;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConcurrencyError {
    #[error("concurrency must be at least 1")]
    Zero,
}

/// Maximum number of in-flight invocations for a bounded run.
///
/// Absence of a `Concurrency` (i.e. `Option::None`) means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "usize")]
pub struct Concurrency(NonZeroUsize);

impl Concurrency {
    /// Strictly one at a time.
    pub const SERIAL: Self = Self(NonZeroUsize::MIN);

    pub fn new(limit: usize) -> Result<Self, ConcurrencyError> {
        NonZeroUsize::new(limit)
            .map(Self)
            .ok_or(ConcurrencyError::Zero)
    }

    #[must_use]
    pub const fn from_non_zero(limit: NonZeroUsize) -> Self {
        Self(limit)
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }

    /// Number of invocations to start up front for `total` inputs.
    #[must_use]
    pub fn window(self, total: usize) -> usize {
        self.get().min(total)
    }
}

impl TryFrom<usize> for Concurrency {
    type Error = ConcurrencyError;

    fn try_from(limit: usize) -> Result<Self, Self::Error> {
        Self::new(limit)
    }
}

impl fmt::Display for Concurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Time a batch waits for more tasks before it is flushed.
///
/// `BatchDelay::ZERO` flushes on the next scheduling opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BatchDelay(Duration);

impl BatchDelay {
    pub const ZERO: Self = Self(Duration::ZERO);

    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self(delay)
    }

    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    #[must_use]
    pub const fn as_duration(self) -> Duration {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl From<Duration> for BatchDelay {
    fn from(delay: Duration) -> Self {
        Self(delay)
    }
}
