//! Change listeners for the stateful services.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;
type Registry<T> = Mutex<Vec<(u64, Callback<T>)>>;

/// Set of callbacks notified with a snapshot after each successful mutation.
pub struct Listeners<T> {
    next_id: AtomicU64,
    registry: Arc<Registry<T>>,
}

impl<T: 'static> Listeners<T> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            registry: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Registers a callback until the returned subscription is cancelled.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(callback)));

        let registry: Weak<Registry<T>> = Arc::downgrade(&self.registry);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(registry) = registry.upgrade() {
                    registry
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .retain(|(entry, _)| *entry != id);
                }
            })),
        }
    }

    /// Calls every registered callback with `snapshot`.
    ///
    /// Callbacks run outside the registry lock, so they may unsubscribe.
    pub fn notify(&self, snapshot: &T) {
        let callbacks: Vec<Callback<T>> = self
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in callbacks {
            callback(snapshot);
        }
    }

    /// Number of active callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nobody is listening.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: 'static> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Handle returned by `subscribe`.
///
/// Dropping it keeps the callback registered; call [`Subscription::unsubscribe`]
/// to stop notifications.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Removes the callback. Later notifications no longer reach it.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_notify_and_unsubscribe() {
        let listeners: Listeners<Vec<u32>> = Listeners::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let subscription = listeners.subscribe(move |snapshot: &Vec<u32>| {
            counter.fetch_add(snapshot.len(), Ordering::SeqCst);
        });
        assert_eq!(listeners.len(), 1);

        listeners.notify(&vec![1, 2, 3]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        subscription.unsubscribe();
        assert!(listeners.is_empty());
        listeners.notify(&vec![1]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_unsubscribe_only_removes_own_callback() {
        let listeners: Listeners<u32> = Listeners::new();
        let first = listeners.subscribe(|_| {});
        let _second = listeners.subscribe(|_| {});
        first.unsubscribe();
        assert_eq!(listeners.len(), 1);
    }

    #[test]
    fn test_unsubscribe_after_owner_dropped() {
        let listeners: Listeners<u32> = Listeners::new();
        let subscription = listeners.subscribe(|_| {});
        drop(listeners);
        subscription.unsubscribe();
    }
}
