//! Per-key FIFO mutual exclusion.
//!
//! Every call to [`KeyedLock::with_key_lock`] appends a link to the queue for
//! its key. A link's handler starts only after the previous link for the same
//! key has settled, whatever its outcome, so at most one handler per key runs
//! at a time and handlers run in call order.
//!
//! # Links
//!
//! Each key's entry records the link that currently holds the key and the
//! links waiting behind it. A link settles when its handler finishes, panics,
//! or its future is dropped. A settling holder hands the key directly to the
//! next waiter through that waiter's `oneshot`. A waiter dropped before its
//! turn just leaves the queue. Hand-off and departure are O(1) in queue
//! length apart from the departing waiter's own removal, and no future ever
//! waits on another link's future.
//!
//! # Reclamation
//!
//! The table only holds keys with pending work. The holder that settles with
//! an empty queue removes its key's entry.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::sync::lock;

struct Waiter {
    link: u64,
    grant: oneshot::Sender<()>,
}

struct KeyState {
    holder: u64,
    waiters: VecDeque<Waiter>,
}

struct Table<K> {
    keys: HashMap<K, KeyState>,
    next_link: u64,
}

/// Serializes async handlers that share a key.
///
/// Cloning a `KeyedLock` yields another handle to the same table.
pub struct KeyedLock<K> {
    table: Arc<Mutex<Table<K>>>,
}

impl<K> KeyedLock<K>
where
    K: Hash + Eq + Clone,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Arc::new(Mutex::new(Table {
                keys: HashMap::new(),
                next_link: 0,
            })),
        }
    }

    /// Run `handler` once every earlier call for `key` has settled.
    ///
    /// Registration happens when this method is called, not when the
    /// returned future is first polled: a call made after this one for the
    /// same key always runs after it. The handler's output is returned
    /// unchanged; an `Err` or panic only affects this caller.
    pub fn with_key_lock<F, Fut, T>(
        &self,
        key: K,
        handler: F,
    ) -> impl Future<Output = T> + use<K, F, Fut, T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut guard = self.register(key);

        async move {
            if let Some(grant) = guard.grant.as_mut() {
                tracing::trace!(link = guard.link, "Waiting for previous holder");
                // The sender lives in the table until this link is granted.
                let _ = grant.await;
            }
            let output = handler().await;
            drop(guard);
            output
        }
    }

    /// Number of keys with pending or running handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.table).keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn register(&self, key: K) -> LinkGuard<K> {
        let mut table = lock(&self.table);

        let link = table.next_link;
        table.next_link = table.next_link.wrapping_add(1);

        let grant = match table.keys.get_mut(&key) {
            Some(state) => {
                let (grant, granted) = oneshot::channel();
                state.waiters.push_back(Waiter { link, grant });
                Some(granted)
            }
            None => {
                table.keys.insert(
                    key.clone(),
                    KeyState {
                        holder: link,
                        waiters: VecDeque::new(),
                    },
                );
                None
            }
        };

        LinkGuard {
            table: Arc::clone(&self.table),
            key,
            link,
            grant,
        }
    }
}

impl<K> Default for KeyedLock<K>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for KeyedLock<K> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

impl<K> fmt::Debug for KeyedLock<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys = lock(&self.table).keys.len();
        f.debug_struct("KeyedLock").field("keys", &keys).finish()
    }
}

/// One link of a key's queue. Dropping it settles the link.
struct LinkGuard<K>
where
    K: Hash + Eq,
{
    table: Arc<Mutex<Table<K>>>,
    key: K,
    link: u64,
    grant: Option<oneshot::Receiver<()>>,
}

impl<K> Drop for LinkGuard<K>
where
    K: Hash + Eq,
{
    fn drop(&mut self) {
        let mut table = lock(&self.table);
        let Some(state) = table.keys.get_mut(&self.key) else {
            return;
        };

        if state.holder != self.link {
            // Still queued: leave without disturbing the holder.
            state.waiters.retain(|waiter| waiter.link != self.link);
            return;
        }

        while let Some(next) = state.waiters.pop_front() {
            if next.grant.send(()).is_ok() {
                state.holder = next.link;
                return;
            }
        }

        table.keys.remove(&self.key);
        tracing::trace!(link = self.link, "Reclaimed idle key");
    }
}
