//! Ripple Core
//!
//! This crate provides the reactive state layer for the Ripple application
//! starter. It implements:
//!
//! - Reactive primitives (signals, memos, effects)
//! - Signal utilities (counter, toggle, derived array views, debounce,
//!   persistent signals)
//! - A key-value persistence bridge
//! - The application shell and signals context provider
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `reactive`: Core reactive primitives and dependency tracking
//! - `util`: Factories building higher-level reactive objects from the
//!   primitives
//! - `storage`: Key-value backends that persistent signals write through to
//! - `app`: Document, context provider, theme wiring, and shell rendering
//!
//! # Example
//!
//! ```rust
//! use ripple_core::reactive::{Effect, Memo, Signal};
//!
//! let count = Signal::new(0);
//!
//! let count_for_memo = count.clone();
//! let doubled = Memo::new(move || count_for_memo.get() * 2);
//!
//! let count_for_effect = count.clone();
//! let _effect = Effect::new(move || {
//!     let _ = count_for_effect.get();
//! });
//!
//! count.set(5);
//! assert_eq!(doubled.get(), 10);
//! ```

pub mod app;
pub mod reactive;
pub mod storage;
pub mod util;

/// Crate version, injected from build metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
