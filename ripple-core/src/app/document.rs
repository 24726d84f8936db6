//! Document root abstraction.
//!
//! The closest thing the library has to a DOM: a shared handle to the
//! mount point's root element attributes. The theme effect writes the
//! `data-theme` attribute here and the shell reads it back when rendering.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// Shared handle to the document root's attributes.
#[derive(Clone, Default)]
pub struct Document {
    attributes: Arc<RwLock<HashMap<String, String>>>,
}

impl Document {
    /// Create a document with no attributes set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute on the document root.
    pub fn set_root_attribute(&self, name: &str, value: &str) {
        self.attributes
            .write()
            .insert(name.to_owned(), value.to_owned());
    }

    /// Read an attribute from the document root.
    pub fn root_attribute(&self, name: &str) -> Option<String> {
        self.attributes.read().get(name).cloned()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("attributes", &*self.attributes.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_round_trip() {
        let document = Document::new();
        assert_eq!(document.root_attribute("data-theme"), None);

        document.set_root_attribute("data-theme", "dark");
        assert_eq!(
            document.root_attribute("data-theme"),
            Some("dark".to_owned())
        );
    }

    #[test]
    fn clones_share_attributes() {
        let document = Document::new();
        let view = document.clone();

        document.set_root_attribute("data-theme", "light");
        assert_eq!(view.root_attribute("data-theme"), Some("light".to_owned()));
    }
}
