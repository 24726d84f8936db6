//! Reactive runtime.
//!
//! The runtime is the observer registry that connects signals, memos, and
//! effects. It keeps two maps: dependency edges (source id to the set of
//! subscribers that read it) and a registry of weak handles to the
//! subscribers themselves.
//!
//! # Propagation
//!
//! When a source is written, `Runtime::notify` walks the dependency graph:
//!
//! 1. Every dependent is invalidated.
//! 2. Lazy dependents (memos) publish under their own source id, so a
//!    newly-stale memo cascades invalidation to its dependents in turn.
//!    They do not recompute here; recomputation happens on the next read.
//! 3. Eager dependents (effects) are collected during the walk and re-run
//!    once the whole graph has been invalidated.
//!
//! This push-invalidate / pull-recompute split keeps derived values lazy
//! while effects observe every write synchronously.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::RwLock;

use super::subscriber::SubscriberId;

/// Counter for source ids. Signals and memos share this id space.
static SOURCE_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Allocate a fresh source id.
pub(crate) fn next_source_id() -> u64 {
    SOURCE_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A reactive consumer that can be notified when a source it read changes.
pub trait Dependent: Send + Sync {
    /// The subscriber id this consumer registers edges under.
    fn subscriber_id(&self) -> SubscriberId;

    /// Mark the consumer stale. Returns true if it was fresh before, so the
    /// runtime knows whether to cascade the invalidation further.
    fn invalidate(&self) -> bool;

    /// Eager consumers (effects) are re-run on notify; lazy consumers
    /// (memos) recompute on their next read instead.
    fn is_eager(&self) -> bool;

    /// Re-run the consumer. Only called for eager consumers.
    fn run(&self);

    /// The source id this consumer itself publishes under, if it is also a
    /// source (memos). Used to cascade invalidation through derived nodes.
    fn as_source(&self) -> Option<u64> {
        None
    }
}

static REGISTRY: OnceLock<RwLock<HashMap<SubscriberId, Weak<dyn Dependent>>>> = OnceLock::new();
static EDGES: OnceLock<RwLock<HashMap<u64, HashSet<SubscriberId>>>> = OnceLock::new();

fn registry() -> &'static RwLock<HashMap<SubscriberId, Weak<dyn Dependent>>> {
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

fn edges() -> &'static RwLock<HashMap<u64, HashSet<SubscriberId>>> {
    EDGES.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Handle to a registered dependent.
///
/// Dropping the handle unregisters the dependent and removes its edges.
pub struct RuntimeHandle {
    subscriber_id: SubscriberId,
}

impl Drop for RuntimeHandle {
    fn drop(&mut self) {
        Runtime::unregister(self.subscriber_id);
    }
}

/// The global reactive runtime.
pub struct Runtime;

impl Runtime {
    /// Register a dependent. The runtime holds only a weak reference; the
    /// returned handle unregisters the dependent when dropped.
    pub fn register(dependent: Arc<dyn Dependent>) -> RuntimeHandle {
        let id = dependent.subscriber_id();
        registry().write().insert(id, Arc::downgrade(&dependent));
        RuntimeHandle { subscriber_id: id }
    }

    fn unregister(id: SubscriberId) {
        registry().write().remove(&id);
        Self::clear_edges(id);
    }

    /// Record that `subscriber` read `source_id`.
    ///
    /// Called by signals and memos when read inside a tracking scope. The
    /// edge set deduplicates, so repeated reads cost one edge.
    pub fn add_edge(source_id: u64, subscriber: SubscriberId) {
        edges().write().entry(source_id).or_default().insert(subscriber);
    }

    /// Remove every edge pointing at `subscriber`.
    ///
    /// Called before a computation re-runs so stale dependencies from the
    /// previous run do not keep triggering it.
    pub fn clear_edges(subscriber: SubscriberId) {
        // Drop entries whose subscriber set empties out, so the edge map
        // does not accumulate dead sources over the process lifetime.
        edges().write().retain(|_, subs| {
            subs.remove(&subscriber);
            !subs.is_empty()
        });
    }

    /// Notify all dependents that `source_id` was written.
    pub fn notify(source_id: u64) {
        let mut eager: Vec<Arc<dyn Dependent>> = Vec::new();
        let mut queue = VecDeque::from([source_id]);

        while let Some(current) = queue.pop_front() {
            let subscribers: Vec<SubscriberId> = {
                let edges = edges().read();
                match edges.get(&current) {
                    Some(subs) => subs.iter().copied().collect(),
                    None => continue,
                }
            };

            let dependents: Vec<Arc<dyn Dependent>> = {
                let registry = registry().read();
                subscribers
                    .iter()
                    .filter_map(|id| registry.get(id).and_then(Weak::upgrade))
                    .collect()
            };

            // Locks are released before touching the dependents, so an
            // invalidation or effect run may re-enter the runtime.
            for dependent in dependents {
                let newly_stale = dependent.invalidate();
                if dependent.is_eager() {
                    let id = dependent.subscriber_id();
                    if !eager.iter().any(|e| e.subscriber_id() == id) {
                        eager.push(dependent);
                    }
                } else if newly_stale {
                    if let Some(published) = dependent.as_source() {
                        queue.push_back(published);
                    }
                }
            }
        }

        for dependent in eager {
            dependent.run();
        }
    }

    /// Whether `subscriber` currently has an edge from `source_id`.
    /// Mainly useful for tests and diagnostics.
    pub fn has_edge(source_id: u64, subscriber: SubscriberId) -> bool {
        edges()
            .read()
            .get(&source_id)
            .is_some_and(|subs| subs.contains(&subscriber))
    }
}
