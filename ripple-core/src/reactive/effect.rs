//! Effect implementation.
//!
//! An effect is an eager side-effecting subscription. It runs once at
//! construction to establish its dependencies and again, synchronously,
//! every time one of those dependencies is written. Before each re-run its
//! old edges are cleared so dependencies picked up on a previous run do not
//! keep triggering it.
//!
//! Effects are the push half of the reactive system; memos are the pull
//! half. Use an effect to mirror reactive state into the outside world:
//! document attributes, logging, persistence.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use super::context::TrackingScope;
use super::runtime::{Dependent, Runtime, RuntimeHandle};
use super::subscriber::SubscriberId;

struct EffectInner {
    subscriber_id: SubscriberId,
    run_fn: Box<dyn Fn() + Send + Sync>,
    disposed: AtomicBool,
    run_count: AtomicUsize,
}

impl EffectInner {
    fn execute(&self) {
        if self.disposed.load(Ordering::SeqCst) {
            return;
        }

        Runtime::clear_edges(self.subscriber_id);

        {
            let _scope = TrackingScope::enter(self.subscriber_id);
            (self.run_fn)();
        }

        self.run_count.fetch_add(1, Ordering::SeqCst);
    }
}

impl Dependent for EffectInner {
    fn subscriber_id(&self) -> SubscriberId {
        self.subscriber_id
    }

    fn invalidate(&self) -> bool {
        true
    }

    fn is_eager(&self) -> bool {
        true
    }

    fn run(&self) {
        self.execute();
    }
}

/// A side-effecting computation re-run whenever its dependencies change.
pub struct Effect {
    inner: Arc<EffectInner>,
    _registration: Arc<RuntimeHandle>,
}

impl Effect {
    /// Create a new effect. The function runs immediately to apply the
    /// initial state and establish dependencies.
    pub fn new<F>(run: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let inner = Arc::new(EffectInner {
            subscriber_id: SubscriberId::new(),
            run_fn: Box::new(run),
            disposed: AtomicBool::new(false),
            run_count: AtomicUsize::new(0),
        });
        let registration = Runtime::register(inner.clone());
        let effect = Self {
            inner,
            _registration: Arc::new(registration),
        };
        effect.inner.execute();
        effect
    }

    /// Stop the effect permanently. Dependency writes after disposal no
    /// longer run it.
    pub fn dispose(&self) {
        self.inner.disposed.store(true, Ordering::SeqCst);
        Runtime::clear_edges(self.inner.subscriber_id);
    }

    /// Whether the effect has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    /// Number of times the effect has run.
    pub fn run_count(&self) -> usize {
        self.inner.run_count.load(Ordering::SeqCst)
    }
}

impl Clone for Effect {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _registration: Arc::clone(&self._registration),
        }
    }
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effect")
            .field("run_count", &self.run_count())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
