//! Reactive primitives.
//!
//! This module implements the core reactive system: signals, memos, and
//! effects, tied together by automatic dependency tracking.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A [`Signal`] is a container for mutable state. Reading it inside a memo
//! or effect registers that computation as a dependent; every write
//! notifies all dependents.
//!
//! ## Memos
//!
//! A [`Memo`] is a derived view that caches its result. A dependency write
//! only marks it stale; the value recomputes lazily on the next read.
//!
//! ## Effects
//!
//! An [`Effect`] is a side-effecting subscription. It runs once at
//! construction and re-runs synchronously on every dependency write. Use
//! effects to mirror reactive state into external systems.
//!
//! # Implementation notes
//!
//! Dependency tracking is transparent: a thread-local [`TrackingScope`]
//! records which computation is evaluating, and signal reads register
//! edges with the [`Runtime`] observer registry. The same approach is used
//! by SolidJS, Vue 3, and Leptos.

mod context;
mod effect;
mod memo;
mod runtime;
mod signal;
mod subscriber;

pub use context::TrackingScope;
pub use effect::Effect;
pub use memo::Memo;
pub use runtime::{Dependent, Runtime, RuntimeHandle};
pub use signal::{ReadOnlySignal, Signal};
pub use subscriber::SubscriberId;
