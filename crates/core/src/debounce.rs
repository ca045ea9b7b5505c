//! Keyed delay-and-cancel timers.
//!
//! Each key has at most one pending action. Scheduling under a key aborts the
//! previous timer for that key, so of a burst of calls only the last one can
//! ever fire, and only after `delay` has passed without a newer call.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::trace;

struct PendingTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

struct TimerTable<K> {
    next_generation: u64,
    pending: HashMap<K, PendingTimer>,
}

/// Keyed debounce scheduler.
///
/// Timers run on the ambient tokio runtime, so `schedule` must be called from
/// within one. Dropping the scheduler aborts every pending timer.
pub struct Debouncer<K> {
    table: Arc<Mutex<TimerTable<K>>>,
}

impl<K> Default for Debouncer<K>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Debouncer<K>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            table: Arc::new(Mutex::new(TimerTable {
                next_generation: 0,
                pending: HashMap::new(),
            })),
        }
    }

    /// Run `action` once `delay` elapses with no newer `schedule` under `key`.
    ///
    /// Any timer already pending under `key` is aborted.
    pub fn schedule<F>(&self, key: K, delay: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        // Held across spawn so the timer cannot observe the table before its
        // own entry is inserted.
        let mut table = lock(&self.table);

        if let Some(previous) = table.pending.remove(&key) {
            previous.handle.abort();
            trace!(key = ?key, "Superseded pending timer");
        }

        table.next_generation += 1;
        let generation = table.next_generation;

        let deadline = Instant::now() + delay;
        let shared = Arc::clone(&self.table);
        let timer_key = key.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;

            let due = {
                let mut table = lock(&shared);
                match table.pending.get(&timer_key) {
                    Some(timer) if timer.generation == generation => {
                        table.pending.remove(&timer_key);
                        true
                    }
                    _ => false,
                }
            };

            if due {
                trace!(key = ?timer_key, "Timer fired");
                action();
            }
        });

        table
            .pending
            .insert(key, PendingTimer { generation, handle });
    }

    /// Abort the pending action under `key`, if any.
    pub fn cancel(&self, key: &K) {
        if let Some(timer) = lock(&self.table).pending.remove(key) {
            timer.handle.abort();
            trace!(key = ?key, "Cancelled pending timer");
        }
    }

    /// Abort every pending action.
    pub fn cancel_all(&self) {
        for (_, timer) in lock(&self.table).pending.drain() {
            timer.handle.abort();
        }
    }

    pub fn is_pending(&self, key: &K) -> bool {
        lock(&self.table).pending.contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.table).pending.len()
    }
}

impl<K> Drop for Debouncer<K> {
    fn drop(&mut self) {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        for (_, timer) in table.pending.drain() {
            timer.handle.abort();
        }
    }
}

fn lock<K>(table: &Mutex<TimerTable<K>>) -> MutexGuard<'_, TimerTable<K>> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}
