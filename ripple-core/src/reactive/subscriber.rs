//! Subscriber identity for the reactive system.
//!
//! Every consumer of reactive values (memo or effect) is identified by a
//! `SubscriberId`. The runtime uses these ids to record dependency edges
//! and to look up the consumer when one of its sources changes.

use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a reactive consumer.
///
/// Ids are handed out by an atomic counter, so they are unique across
/// threads for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Generate a new unique subscriber id.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_ids_are_unique() {
        let id1 = SubscriberId::new();
        let id2 = SubscriberId::new();
        let id3 = SubscriberId::new();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }
}
