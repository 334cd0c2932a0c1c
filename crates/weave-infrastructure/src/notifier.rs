//! Build-completion notifier
//!
//! A write-once slot plus a list of waiting observers. Observers subscribed
//! before [`BuildNotifier::publish`] are called when the value arrives;
//! observers subscribed afterwards are called immediately with the stored
//! value. Either way each observer runs exactly once.
//!
//! Observers never run while the internal lock is held, so an observer may
//! subscribe to (or inspect) the notifier that is calling it.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, warn};

type Observer<T> = Box<dyn FnOnce(T) + Send>;

struct NotifierState<T> {
    value: Option<T>,
    observers: Vec<Observer<T>>,
}

/// One-shot broadcast of a built value
///
/// Clones share the same slot.
pub struct BuildNotifier<T> {
    state: Arc<Mutex<NotifierState<T>>>,
}

impl<T: Clone + Send + 'static> BuildNotifier<T> {
    /// Create a notifier that has not published yet
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(NotifierState {
                value: None,
                observers: Vec::new(),
            })),
        }
    }

    /// Call `observer` with the value once it is published
    ///
    /// Runs `observer` immediately when the value is already available.
    pub fn subscribe<F>(&self, observer: F)
    where
        F: FnOnce(T) + Send + 'static,
    {
        let mut state = self.lock();
        match state.value.clone() {
            Some(value) => {
                drop(state);
                notify(Box::new(observer), value);
            }
            None => state.observers.push(Box::new(observer)),
        }
    }

    /// Store `value` and notify every waiting observer in subscription order
    ///
    /// Returns `false`, leaving the stored value untouched, when a value has
    /// already been published.
    pub fn publish(&self, value: T) -> bool {
        let observers = {
            let mut state = self.lock();
            if state.value.is_some() {
                warn!("Build notifier already published; ignoring value");
                return false;
            }
            state.value = Some(value.clone());
            std::mem::take(&mut state.observers)
        };

        debug!(observers = observers.len(), "Publishing build result");
        for observer in observers {
            notify(observer, value.clone());
        }
        true
    }

    /// The published value, if any
    pub fn value(&self) -> Option<T> {
        self.lock().value.clone()
    }

    /// Whether a value has been published
    pub fn is_published(&self) -> bool {
        self.lock().value.is_some()
    }

    /// Number of observers still waiting for the value
    pub fn subscriber_count(&self) -> usize {
        self.lock().observers.len()
    }

    fn lock(&self) -> MutexGuard<'_, NotifierState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Run one observer, containing a panic so the others still run
fn notify<T>(observer: Observer<T>, value: T) {
    if let Err(panic) = catch_unwind(AssertUnwindSafe(move || observer(value))) {
        let message = panic
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        error!(panic = %message, "Build observer panicked");
    }
}

impl<T: Clone + Send + 'static> Default for BuildNotifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for BuildNotifier<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> fmt::Debug for BuildNotifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("BuildNotifier")
            .field("published", &state.value.is_some())
            .field("observers", &state.observers.len())
            .finish()
    }
}
