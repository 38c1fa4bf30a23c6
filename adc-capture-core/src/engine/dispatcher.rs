use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::sample::BufferId;
use crate::traits::observer::CompletionCallback;

/// Hand-off point between completion context and consumer code.
///
/// Holds at most one observer; this is not a queue. At most one completion
/// is logically in flight per leg, and `dispatch` returns before the
/// corresponding leg can legally re-trigger (enforced by the engine's
/// completion ordering, not here).
///
/// `dispatch` clones the observer under the lock and invokes it after
/// releasing, so replacing the observer is atomic with respect to in-flight
/// completions: an event reaches the old observer or the new one, never
/// both, and a handler never sees a partially updated slot.
pub struct CompletionDispatcher<T> {
    observer: Arc<Mutex<Option<CompletionCallback<T>>>>,
}

impl<T> Clone for CompletionDispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            observer: Arc::clone(&self.observer),
        }
    }
}

impl<T> Default for CompletionDispatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CompletionDispatcher<T> {
    pub fn new() -> Self {
        Self {
            observer: Arc::new(Mutex::new(None)),
        }
    }

    /// Install or replace the observer (last writer wins). Takes effect no
    /// later than the next completion boundary.
    pub fn set(&self, observer: CompletionCallback<T>) {
        *self.observer.lock() = Some(observer);
    }

    /// Remove the observer; subsequent completions go unobserved.
    pub fn clear(&self) {
        *self.observer.lock() = None;
    }

    /// Deliver one completion. Returns whether an observer was invoked.
    pub fn dispatch(&self, id: BufferId, samples: &[T]) -> bool {
        let observer = self.observer.lock().clone();
        match observer {
            Some(observer) => {
                observer(id, samples);
                true
            }
            None => false,
        }
    }
}
