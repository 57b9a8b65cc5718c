//! Publish-on-change holder for the latest view snapshot.
//!
//! Listeners run synchronously inside [`StateHolder::publish`], after the
//! new value is stored, and only when the value actually changed.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Listeners<T> {
    next_id: u64,
    entries: BTreeMap<u64, Listener<T>>,
}

pub struct StateHolder<T> {
    current: T,
    listeners: Arc<Mutex<Listeners<T>>>,
}

impl<T> StateHolder<T>
where
    T: PartialEq + Send + 'static,
{
    pub fn new(initial: T) -> Self {
        Self {
            current: initial,
            listeners: Arc::new(Mutex::new(Listeners {
                next_id: 0,
                entries: BTreeMap::new(),
            })),
        }
    }

    #[must_use]
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Registers `listener` until the returned handle is dropped or
    /// [`Subscription::unsubscribe`] is called.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = {
            let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.insert(id, Arc::new(listener));
            id
        };

        let registry: Weak<Mutex<Listeners<T>>> = Arc::downgrade(&self.listeners);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(listeners) = registry.upgrade() {
                    listeners
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .entries
                        .remove(&id);
                }
            })),
        }
    }

    /// Stores `next` and notifies listeners. Returns `false` (and notifies
    /// nobody) when `next` equals the current value.
    pub fn publish(&mut self, next: T) -> bool {
        if next == self.current {
            return false;
        }
        self.current = next;

        // Snapshot so a listener may subscribe or unsubscribe while being called.
        let snapshot: Vec<Listener<T>> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .values()
            .cloned()
            .collect();

        for listener in snapshot {
            listener(&self.current);
        }
        true
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }
}

impl<T: fmt::Debug> fmt::Debug for StateHolder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateHolder")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

/// Handle returned by [`StateHolder::subscribe`].
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
