//! Application shell.
//!
//! Renders the application tree as text from the current signal state:
//! a header, the counter line, the dark-mode indicator, and the version
//! footer. Rendering is a pure read; call it again after mutating state
//! to observe the update.

use std::sync::Arc;

use super::context::AppSignals;
use super::document::Document;

/// The rendered application tree for one mount point.
pub struct Shell {
    signals: Arc<AppSignals>,
    document: Document,
}

impl Shell {
    /// Create a shell over the given signal bundle and document.
    pub fn new(signals: Arc<AppSignals>, document: Document) -> Self {
        Self { signals, document }
    }

    /// Render the application tree from the current state.
    pub fn render(&self) -> String {
        let count = self.signals.counter.get();
        let dark = self.signals.dark_mode.get();
        let version = self.signals.app_version.get();
        let theme = self
            .document
            .root_attribute("data-theme")
            .unwrap_or_else(|| "light".to_owned());

        let mut out = String::new();
        out.push_str("== Ripple ==\n");
        out.push_str(&format!("[ count is {count} ]\n"));
        out.push_str(&format!(
            "dark mode: {} (theme: {theme})\n",
            if dark { "ON" } else { "OFF" }
        ));
        out.push_str(&format!("v{version}\n"));
        out
    }
}
