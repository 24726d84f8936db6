//! Utility factories for working with signals.
//!
//! Common patterns and helpers for reactive state management, built only
//! on the primitives in [`crate::reactive`].

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::reactive::{Memo, ReadOnlySignal, Signal};
use crate::storage::KeyValueStore;

/// A counter signal with increment/decrement controls.
///
/// # Example
///
/// ```rust
/// use ripple_core::util::Counter;
///
/// let counter = Counter::new(5);
/// counter.increment(); // 6
/// counter.decrement(); // 5
/// counter.reset();     // back to 5
/// ```
#[derive(Clone, Debug)]
pub struct Counter {
    /// The underlying count signal.
    pub count: Signal<i64>,
    initial: i64,
}

impl Counter {
    /// Create a counter starting at `initial`.
    pub fn new(initial: i64) -> Self {
        Self {
            count: Signal::new(initial),
            initial,
        }
    }

    /// Current count.
    pub fn get(&self) -> i64 {
        self.count.get()
    }

    /// Add one to the count.
    pub fn increment(&self) {
        self.count.update(|v| *v += 1);
    }

    /// Subtract one from the count.
    pub fn decrement(&self) {
        self.count.update(|v| *v -= 1);
    }

    /// Restore the value the counter was constructed with.
    pub fn reset(&self) {
        self.count.set(self.initial);
    }

    /// Overwrite the count.
    pub fn set(&self, value: i64) {
        self.count.set(value);
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new(0)
    }
}

/// A boolean toggle signal.
#[derive(Clone, Debug)]
pub struct Toggle {
    /// The underlying state signal.
    pub state: Signal<bool>,
}

impl Toggle {
    /// Create a toggle starting at `initial`.
    pub fn new(initial: bool) -> Self {
        Self {
            state: Signal::new(initial),
        }
    }

    /// Current state.
    pub fn get(&self) -> bool {
        self.state.get()
    }

    /// Flip the state.
    pub fn toggle(&self) {
        self.state.update(|v| *v = !*v);
    }

    /// Force the state to true.
    pub fn on(&self) {
        self.state.set(true);
    }

    /// Force the state to false.
    pub fn off(&self) {
        self.state.set(false);
    }

    /// Overwrite the state.
    pub fn set(&self, value: bool) {
        self.state.set(value);
    }
}

impl Default for Toggle {
    fn default() -> Self {
        Self::new(false)
    }
}

/// A derived view of an array signal's length.
///
/// Recomputed lazily: reads after a write to `source` see the new length.
pub fn array_length<T>(source: &Signal<Vec<T>>) -> Memo<usize>
where
    T: Clone + Send + Sync + 'static,
{
    let source = source.clone();
    Memo::new(move || source.with(|items| items.len()))
}

/// A derived view of the elements of `source` matching `predicate`.
///
/// The predicate must be a pure function of its argument.
pub fn filter_array<T, P>(source: &Signal<Vec<T>>, predicate: P) -> Memo<Vec<T>>
where
    T: Clone + Send + Sync + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
{
    let source = source.clone();
    Memo::new(move || {
        source.with(|items| items.iter().filter(|&item| predicate(item)).cloned().collect())
    })
}

/// Delay used by [`debounce`] callers that have no specific requirement.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

/// A read-only view that lags `source` by `delay`.
///
/// Every write to `source` cancels the pending timer and schedules a new
/// one; only the last value written before a quiet window of `delay`
/// elapses is committed. Intermediate values are discarded, and nothing is
/// flushed on teardown.
///
/// Must be called from within a tokio runtime; the timer task runs on it.
pub fn debounce<T>(source: &Signal<T>, delay: Duration) -> ReadOnlySignal<T>
where
    T: Clone + Send + Sync + 'static,
{
    let handle = tokio::runtime::Handle::current();
    let debounced = Signal::new(source.get_untracked());
    let sink = debounced.clone();
    let pending: Arc<Mutex<Option<JoinHandle<()>>>> = Arc::new(Mutex::new(None));

    source.subscribe(move |value| {
        let value = value.clone();
        let sink = sink.clone();
        // Deadline is fixed at write time, so a timer that outlives rapid
        // writes commits exactly the last value of the quiet window.
        let deadline = tokio::time::Instant::now() + delay;
        let task = handle.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            sink.set(value);
        });
        if let Some(previous) = pending.lock().replace(task) {
            previous.abort();
        }
    });

    debounced.read_only()
}

/// A signal mirrored to a key-value store under `key`.
///
/// The stored value is loaded once at construction; if the key is absent,
/// the store unreachable, or the payload unparsable, `initial` is used and
/// no error is raised. Every write afterwards is JSON-encoded and written
/// through. Persistence failures are swallowed: the in-memory value stays
/// authoritative.
///
/// Two persistent signals sharing a key are not kept in sync after
/// construction; writes go out, nothing listens for storage changes.
pub fn persistent_signal<T>(
    store: Arc<dyn KeyValueStore>,
    key: impl Into<String>,
    initial: T,
) -> Signal<T>
where
    T: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    let key = key.into();

    let start = match store.get(&key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                debug!(key = %key, %err, "discarding unparsable stored value");
                initial
            }
        },
        Ok(None) => initial,
        Err(err) => {
            warn!(key = %key, %err, "storage unreachable, falling back to default");
            initial
        }
    };

    let signal = Signal::new(start);

    // Mirror the starting value immediately, then write through on every
    // change for the lifetime of the signal.
    signal.with_untracked(|value| persist(&*store, &key, value));
    signal.subscribe(move |value| persist(&*store, &key, value));

    signal
}

fn persist<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(encoded) => {
            if let Err(err) = store.set(key, &encoded) {
                warn!(key, %err, "failed to persist signal value");
            }
        }
        Err(err) => warn!(key, %err, "failed to encode signal value"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError};

    #[test]
    fn counter_starts_at_initial_value() {
        let counter = Counter::new(5);
        assert_eq!(counter.get(), 5);
    }

    #[test]
    fn counter_increment_n_times_yields_n() {
        let counter = Counter::new(0);
        for _ in 0..10 {
            counter.increment();
        }
        assert_eq!(counter.get(), 10);

        for _ in 0..10 {
            counter.decrement();
        }
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn counter_reset_restores_constructed_initial() {
        let counter = Counter::new(10);
        counter.increment();
        counter.increment();
        counter.decrement();
        counter.set(99);
        counter.reset();
        assert_eq!(counter.get(), 10);
    }

    #[test]
    fn counter_set_overwrites() {
        let counter = Counter::new(0);
        counter.set(42);
        assert_eq!(counter.get(), 42);
    }

    #[test]
    fn toggle_twice_returns_to_start() {
        for start in [false, true] {
            let toggle = Toggle::new(start);
            toggle.toggle();
            assert_eq!(toggle.get(), !start);
            toggle.toggle();
            assert_eq!(toggle.get(), start);
        }
    }

    #[test]
    fn toggle_on_off_set() {
        let toggle = Toggle::new(false);
        toggle.on();
        assert!(toggle.get());
        toggle.off();
        assert!(!toggle.get());
        toggle.set(true);
        assert!(toggle.get());
    }

    #[test]
    fn array_length_tracks_source() {
        let items = Signal::new(vec![1, 2, 3]);
        let length = array_length(&items);
        assert_eq!(length.get(), 3);

        items.update(|v| v.push(4));
        assert_eq!(length.get(), 4);
    }

    #[test]
    fn filter_array_applies_predicate() {
        let numbers = Signal::new(vec![1, 2, 3, 4, 5]);
        let evens = filter_array(&numbers, |n| crate::util::math::is_even(*n));
        assert_eq!(evens.get(), vec![2, 4]);

        numbers.update(|v| v.extend([6, 7, 8]));
        assert_eq!(evens.get(), vec![2, 4, 6, 8]);
    }

    #[tokio::test(start_paused = true)]
    async fn debounce_commits_only_last_value_of_quiet_window() {
        let source = Signal::new("initial".to_owned());
        let debounced = debounce(&source, Duration::from_millis(100));

        source.set("first".to_owned());
        source.set("second".to_owned());

        // let the timer tasks start sleeping
        tokio::task::yield_now().await;
        assert_eq!(debounced.get(), "initial");

        tokio::time::advance(Duration::from_millis(100)).await;
        tokio::task::yield_now().await;
        assert_eq!(debounced.get(), "second");
    }

    #[tokio::test(start_paused = true)]
    async fn debounce_default_delay_is_300ms() {
        let source = Signal::new("initial".to_owned());
        let debounced = debounce(&source, DEFAULT_DEBOUNCE_DELAY);

        source.set("updated".to_owned());
        tokio::task::yield_now().await;
        assert_eq!(debounced.get(), "initial");

        tokio::time::advance(Duration::from_millis(300)).await;
        tokio::task::yield_now().await;
        assert_eq!(debounced.get(), "updated");
    }

    #[tokio::test(start_paused = true)]
    async fn debounce_restarts_window_on_each_write() {
        let source = Signal::new(0);
        let debounced = debounce(&source, Duration::from_millis(100));

        source.set(1);
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(60)).await;

        source.set(2);
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(60)).await;
        tokio::task::yield_now().await;

        // 120ms elapsed overall, but only 60ms since the last write
        assert_eq!(debounced.get(), 0);

        tokio::time::advance(Duration::from_millis(40)).await;
        tokio::task::yield_now().await;
        assert_eq!(debounced.get(), 2);
    }

    #[test]
    fn persistent_signal_uses_default_when_store_empty() {
        let store = Arc::new(MemoryStore::new());
        let signal = persistent_signal(store.clone(), "k", "default".to_owned());
        assert_eq!(signal.get(), "default");
    }

    #[test]
    fn persistent_signal_writes_json_on_set() {
        let store = Arc::new(MemoryStore::new());
        let signal = persistent_signal(
            store.clone() as Arc<dyn KeyValueStore>,
            "k",
            "default".to_owned(),
        );

        signal.set("updated".to_owned());
        assert_eq!(store.get("k").unwrap(), Some("\"updated\"".to_owned()));
    }

    #[test]
    fn persistent_signal_prefers_stored_value() {
        let store = Arc::new(MemoryStore::new());
        store.set("k", "\"stored-value\"").unwrap();

        let signal = persistent_signal(
            store.clone() as Arc<dyn KeyValueStore>,
            "k",
            "default".to_owned(),
        );
        assert_eq!(signal.get(), "stored-value");
    }

    #[test]
    fn persistent_signal_discards_unparsable_stored_value() {
        let store = Arc::new(MemoryStore::new());
        store.set("k", "not valid json {{{").unwrap();

        let signal = persistent_signal(
            store.clone() as Arc<dyn KeyValueStore>,
            "k",
            "default".to_owned(),
        );
        assert_eq!(signal.get(), "default");
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io(std::io::Error::other("store offline")))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("store offline")))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("store offline")))
        }
    }

    #[test]
    fn persistent_signal_survives_broken_store() {
        let store = Arc::new(BrokenStore);
        let signal = persistent_signal(store as Arc<dyn KeyValueStore>, "k", 7);
        assert_eq!(signal.get(), 7);

        // write failures are swallowed, memory stays authoritative
        signal.set(8);
        assert_eq!(signal.get(), 8);
    }

    #[test]
    fn persistent_signals_with_same_key_are_independent() {
        let store = Arc::new(MemoryStore::new());
        let a = persistent_signal(store.clone() as Arc<dyn KeyValueStore>, "k", 1);
        let b = persistent_signal(store.clone() as Arc<dyn KeyValueStore>, "k", 1);

        a.set(5);
        assert_eq!(a.get(), 5);
        // b does not follow a after construction; last write wins in the store
        assert_eq!(b.get(), 1);
        assert_eq!(store.get("k").unwrap(), Some("5".to_owned()));
    }
}
