use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock bookkeeping state, recovering from poisoning.
///
/// Critical sections in this crate only swap or push plain values, so a
/// panic elsewhere cannot leave the guarded data half-updated.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
