//! Application layer: document, signals context, and shell.
//!
//! [`App::mount`] is the single entry point: it builds the document,
//! mounts a [`SignalsProvider`], and wires the shell over both.

use std::sync::Arc;

use tracing::debug;

mod context;
mod document;
mod shell;

pub use context::{
    try_use_signals, use_signals, AppSignals, ContextError, SignalsProvider, DARK_MODE_KEY,
};
pub use document::Document;
pub use shell::Shell;

use crate::storage::KeyValueStore;

/// A mounted application: one document, one provider, one shell.
pub struct App {
    document: Document,
    provider: SignalsProvider,
    shell: Shell,
}

impl App {
    /// Mount the application over the given store.
    pub fn mount(store: Arc<dyn KeyValueStore>) -> Self {
        let document = Document::new();
        let provider = SignalsProvider::mount(store, document.clone());
        let shell = Shell::new(provider.signals(), document.clone());
        debug!("application mounted");
        Self {
            document,
            provider,
            shell,
        }
    }

    /// The mount point's document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The shared signal bundle.
    pub fn signals(&self) -> Arc<AppSignals> {
        self.provider.signals()
    }

    /// Render the application tree from the current state.
    pub fn render(&self) -> String {
        self.shell.render()
    }
}
