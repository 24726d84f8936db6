//! Memo implementation.
//!
//! A memo is a lazily recomputed derived view. It caches the result of its
//! computation and carries a single stale flag:
//!
//! - When any dependency is written, the runtime marks the memo stale and
//!   cascades the invalidation to the memo's own dependents.
//! - On the next read, a stale memo re-runs its computation inside a
//!   tracking scope, re-establishing its dependency edges, and caches the
//!   fresh value.
//!
//! Nothing recomputes at write time; consumers must read the memo to
//! observe an update.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::context::TrackingScope;
use super::runtime::{next_source_id, Dependent, Runtime, RuntimeHandle};
use super::subscriber::SubscriberId;

struct MemoInner<T> {
    /// Id this memo publishes under in the dependency graph.
    source_id: u64,
    /// Id this memo consumes under when it reads its own dependencies.
    subscriber_id: SubscriberId,
    compute: Box<dyn Fn() -> T + Send + Sync>,
    value: RwLock<Option<T>>,
    stale: AtomicBool,
}

impl<T> Dependent for MemoInner<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn subscriber_id(&self) -> SubscriberId {
        self.subscriber_id
    }

    fn invalidate(&self) -> bool {
        !self.stale.swap(true, Ordering::SeqCst)
    }

    fn is_eager(&self) -> bool {
        false
    }

    fn run(&self) {}

    fn as_source(&self) -> Option<u64> {
        Some(self.source_id)
    }
}

/// A cached derived value, recomputed lazily on read after a dependency
/// write.
pub struct Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    inner: Arc<MemoInner<T>>,
    _registration: Arc<RuntimeHandle>,
}

impl<T> Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new memo. The computation does not run until first read.
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let inner = Arc::new(MemoInner {
            source_id: next_source_id(),
            subscriber_id: SubscriberId::new(),
            compute: Box::new(compute),
            value: RwLock::new(None),
            stale: AtomicBool::new(true),
        });
        let registration = Runtime::register(inner.clone());
        Self {
            inner,
            _registration: Arc::new(registration),
        }
    }

    /// The memo's source id in the dependency graph.
    pub fn id(&self) -> u64 {
        self.inner.source_id
    }

    /// Get the current value, recomputing first if a dependency changed
    /// since the last read.
    ///
    /// If called while another memo or effect is evaluating, the caller is
    /// registered as a dependent of this memo.
    pub fn get(&self) -> T {
        if let Some(reader) = TrackingScope::current() {
            Runtime::add_edge(self.inner.source_id, reader);
        }

        if !self.inner.stale.load(Ordering::SeqCst) {
            if let Some(value) = self.inner.value.read().as_ref() {
                return value.clone();
            }
        }
        self.recompute()
    }

    /// Whether the cached value is out of date.
    pub fn is_stale(&self) -> bool {
        self.inner.stale.load(Ordering::SeqCst)
    }

    /// Whether the memo has computed at least once.
    pub fn has_value(&self) -> bool {
        self.inner.value.read().is_some()
    }

    fn recompute(&self) -> T {
        Runtime::clear_edges(self.inner.subscriber_id);

        // Clear the flag before computing: a write landing mid-computation
        // re-marks the memo stale and forces a recompute on the next read.
        self.inner.stale.store(false, Ordering::SeqCst);

        let value = {
            let _scope = TrackingScope::enter(self.inner.subscriber_id);
            (self.inner.compute)()
        };

        *self.inner.value.write() = Some(value.clone());
        value
    }
}

impl<T> Clone for Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _registration: Arc::clone(&self._registration),
        }
    }
}

impl<T> Debug for Memo<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memo")
            .field("id", &self.inner.source_id)
            .field("stale", &self.is_stale())
            .field("has_value", &self.has_value())
            .finish()
    }
}
