//! Signal implementation.
//!
//! A signal is the fundamental reactive primitive: a single mutable value
//! cell that notifies its dependents on every write.
//!
//! # Notification
//!
//! A write does two things, in order:
//!
//! 1. Value watchers registered with [`Signal::subscribe`] are called with
//!    the new value. Watchers live as long as the signal itself.
//! 2. The runtime is notified, which invalidates dependent memos and
//!    re-runs dependent effects.
//!
//! Writes always notify; there is no equality dirty-check.
//!
//! # Thread safety
//!
//! The value sits behind a `parking_lot::RwLock` and the handle is a cheap
//! clone sharing the same cell, so signals can cross thread boundaries
//! (the debounce timer task relies on this).

use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::RwLock;

use super::context::TrackingScope;
use super::runtime::{next_source_id, Runtime};

type Watcher<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A reactive signal holding a value of type `T`.
pub struct Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    id: u64,
    value: Arc<RwLock<T>>,
    watchers: Arc<RwLock<Vec<Watcher<T>>>>,
}

impl<T> Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new signal with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            id: next_source_id(),
            value: Arc::new(RwLock::new(value)),
            watchers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// The signal's source id in the dependency graph.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get the current value.
    ///
    /// If called while a memo or effect is evaluating, the caller is
    /// registered as a dependent of this signal.
    pub fn get(&self) -> T {
        self.track();
        self.value.read().clone()
    }

    /// Get the current value without registering a dependency.
    pub fn get_untracked(&self) -> T {
        self.value.read().clone()
    }

    /// Read the value through a closure without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.track();
        f(&self.value.read())
    }

    /// Read the value through a closure without registering a dependency.
    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.read())
    }

    /// Set a new value and notify dependents.
    pub fn set(&self, value: T) {
        {
            *self.value.write() = value;
        }
        self.after_write();
    }

    /// Mutate the value in place and notify dependents.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        {
            let mut guard = self.value.write();
            f(&mut guard);
        }
        self.after_write();
    }

    /// Register a watcher called with the new value after every write.
    ///
    /// Watchers have no unsubscribe path; they live for the lifetime of
    /// the signal's shared cell.
    pub fn subscribe(&self, watcher: impl Fn(&T) + Send + Sync + 'static) {
        self.watchers.write().push(Arc::new(watcher));
    }

    /// A read-only view of this signal.
    pub fn read_only(&self) -> ReadOnlySignal<T> {
        ReadOnlySignal {
            inner: self.clone(),
        }
    }

    /// Number of registered watchers.
    pub fn watcher_count(&self) -> usize {
        self.watchers.read().len()
    }

    fn track(&self) {
        if let Some(subscriber) = TrackingScope::current() {
            Runtime::add_edge(self.id, subscriber);
        }
    }

    fn after_write(&self) {
        // Snapshot value and watcher list so no lock is held while the
        // watchers run; a watcher may read or even write this signal.
        let current = self.value.read().clone();
        let watchers: Vec<Watcher<T>> = self.watchers.read().clone();
        for watcher in &watchers {
            watcher(&current);
        }
        Runtime::notify(self.id);
    }
}

impl<T> Clone for Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            value: Arc::clone(&self.value),
            watchers: Arc::clone(&self.watchers),
        }
    }
}

impl<T> Debug for Signal<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.id)
            .field("value", &self.get_untracked())
            .finish()
    }
}

/// A read-only view of a signal.
///
/// Allows reads and watcher registration but no writes.
pub struct ReadOnlySignal<T>
where
    T: Clone + Send + Sync + 'static,
{
    inner: Signal<T>,
}

impl<T> ReadOnlySignal<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Get the current value, registering a dependency when tracked.
    pub fn get(&self) -> T {
        self.inner.get()
    }

    /// Get the current value without registering a dependency.
    pub fn get_untracked(&self) -> T {
        self.inner.get_untracked()
    }

    /// Read the value through a closure.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.with(f)
    }

    /// Register a watcher called after every write to the underlying cell.
    pub fn subscribe(&self, watcher: impl Fn(&T) + Send + Sync + 'static) {
        self.inner.subscribe(watcher);
    }
}

impl<T> Clone for ReadOnlySignal<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Debug for ReadOnlySignal<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadOnlySignal")
            .field("value", &self.get_untracked())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[test]
    fn signal_get_and_set() {
        let signal = Signal::new(0);
        assert_eq!(signal.get(), 0);

        signal.set(42);
        assert_eq!(signal.get(), 42);
    }

    #[test]
    fn signal_update_mutates_in_place() {
        let signal = Signal::new(vec![1, 2, 3]);
        signal.update(|v| v.push(4));
        assert_eq!(signal.get(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn signal_with_reads_without_cloning() {
        let signal = Signal::new(String::from("hello"));
        let len = signal.with(|s| s.len());
        assert_eq!(len, 5);
    }

    #[test]
    fn signal_notifies_watchers_on_every_write() {
        let signal = Signal::new(0);
        let seen = Arc::new(AtomicI32::new(-1));
        let calls = Arc::new(AtomicI32::new(0));

        let seen_clone = seen.clone();
        let calls_clone = calls.clone();
        signal.subscribe(move |v| {
            seen_clone.store(*v, Ordering::SeqCst);
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(signal.watcher_count(), 1);

        signal.set(1);
        signal.set(2);
        // same value again still notifies
        signal.set(2);

        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn signal_clone_shares_state() {
        let signal1 = Signal::new(0);
        let signal2 = signal1.clone();

        signal1.set(42);
        assert_eq!(signal2.get(), 42);

        signal2.set(100);
        assert_eq!(signal1.get(), 100);
    }

    #[test]
    fn signal_ids_are_unique() {
        let s1 = Signal::new(0);
        let s2 = Signal::new(0);
        assert_ne!(s1.id(), s2.id());
    }

    #[test]
    fn read_only_view_reads_and_subscribes() {
        let signal = Signal::new(7);
        let view = signal.read_only();
        assert_eq!(view.get(), 7);

        let calls = Arc::new(AtomicI32::new(0));
        let calls_clone = calls.clone();
        view.subscribe(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        signal.set(8);
        assert_eq!(view.get(), 8);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
