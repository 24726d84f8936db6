//! Application signals context.
//!
//! The provider constructs the long-lived signal instances once per mount
//! and shares them by reference with every consumer in scope. Exactly one
//! counter and one dark-mode signal exist per live mount.
//!
//! Ownership is explicit: the provider owns the bundle and the theme
//! effect, and consumers reach the bundle either through the handle they
//! were given or through [`use_signals`] while a provider is mounted on
//! the current thread.

use std::cell::RefCell;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::document::Document;
use crate::reactive::{Effect, ReadOnlySignal, Signal};
use crate::storage::KeyValueStore;
use crate::util::{persistent_signal, Counter};

/// Storage key the dark-mode preference persists under.
pub const DARK_MODE_KEY: &str = "dark_mode";

/// Errors from context accessors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    /// No provider is mounted on the current thread.
    #[error("use_signals must be called within a SignalsProvider scope")]
    NoProvider,
}

/// The shared signal bundle for one application mount.
#[derive(Debug)]
pub struct AppSignals {
    /// Application version, fixed from build metadata. Never mutated.
    pub app_version: ReadOnlySignal<String>,
    /// The application counter.
    pub counter: Counter,
    /// Dark-mode preference, persisted under [`DARK_MODE_KEY`].
    pub dark_mode: Signal<bool>,
}

thread_local! {
    static PROVIDERS: RefCell<Vec<Arc<AppSignals>>> = const { RefCell::new(Vec::new()) };
}

/// Provider that owns one [`AppSignals`] bundle and its theme effect.
///
/// Mounting pushes the bundle onto a thread-local provider stack;
/// dropping the provider removes it again.
pub struct SignalsProvider {
    signals: Arc<AppSignals>,
    _theme_effect: Effect,
}

impl SignalsProvider {
    /// Construct the signal bundle and mount it on the current thread.
    ///
    /// The dark-mode preference is loaded from `store`, and the theme
    /// effect applies the current theme to `document` immediately and on
    /// every subsequent toggle.
    pub fn mount(store: Arc<dyn KeyValueStore>, document: Document) -> Self {
        let counter = Counter::new(0);
        let dark_mode = persistent_signal(store, DARK_MODE_KEY, false);
        let app_version = Signal::new(env!("CARGO_PKG_VERSION").to_owned()).read_only();

        let signals = Arc::new(AppSignals {
            app_version,
            counter,
            dark_mode,
        });

        let dark_mode = signals.dark_mode.clone();
        let theme_effect = Effect::new(move || {
            let theme = if dark_mode.get() { "dark" } else { "light" };
            document.set_root_attribute("data-theme", theme);
            debug!(theme, "applied document theme");
        });

        PROVIDERS.with(|stack| stack.borrow_mut().push(signals.clone()));

        Self {
            signals,
            _theme_effect: theme_effect,
        }
    }

    /// The bundle owned by this provider.
    pub fn signals(&self) -> Arc<AppSignals> {
        self.signals.clone()
    }
}

impl Drop for SignalsProvider {
    fn drop(&mut self) {
        PROVIDERS.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(index) = stack
                .iter()
                .rposition(|entry| Arc::ptr_eq(entry, &self.signals))
            {
                stack.remove(index);
            }
        });
    }
}

/// The current provider's signal bundle, if one is mounted on this thread.
pub fn try_use_signals() -> Result<Arc<AppSignals>, ContextError> {
    PROVIDERS
        .with(|stack| stack.borrow().last().cloned())
        .ok_or(ContextError::NoProvider)
}

/// The current provider's signal bundle.
///
/// # Panics
///
/// Panics immediately when called outside a mounted [`SignalsProvider`]
/// scope. This is the one hard failure in the library; use
/// [`try_use_signals`] to recover instead.
pub fn use_signals() -> Arc<AppSignals> {
    match try_use_signals() {
        Ok(signals) => signals,
        Err(err) => panic!("{err}"),
    }
}
