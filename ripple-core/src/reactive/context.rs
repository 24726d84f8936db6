//! Tracking scope for automatic dependency collection.
//!
//! While a memo or effect is evaluating, its subscriber id sits on top of a
//! thread-local stack. Any signal read during that evaluation sees the id
//! and registers a dependency edge with the runtime. Nested evaluations
//! (a memo reading another memo) push and pop in LIFO order, so reads are
//! always attributed to the innermost computation.

use std::cell::RefCell;

use super::SubscriberId;

thread_local! {
    static SCOPE_STACK: RefCell<Vec<SubscriberId>> = const { RefCell::new(Vec::new()) };
}

/// Guard for an active tracking scope.
///
/// Entering pushes the subscriber onto the thread-local stack; dropping the
/// guard pops it again, even if the computation panics.
pub struct TrackingScope {
    subscriber_id: SubscriberId,
}

impl TrackingScope {
    /// Enter a tracking scope for the given subscriber.
    ///
    /// Signal reads performed while the returned guard is alive register
    /// `subscriber_id` as a dependent of the signal.
    pub fn enter(subscriber_id: SubscriberId) -> Self {
        SCOPE_STACK.with(|stack| stack.borrow_mut().push(subscriber_id));
        Self { subscriber_id }
    }

    /// The subscriber currently being tracked on this thread, if any.
    pub fn current() -> Option<SubscriberId> {
        SCOPE_STACK.with(|stack| stack.borrow().last().copied())
    }

    /// Whether any tracking scope is active on this thread.
    pub fn is_active() -> bool {
        SCOPE_STACK.with(|stack| !stack.borrow().is_empty())
    }
}

impl Drop for TrackingScope {
    fn drop(&mut self) {
        SCOPE_STACK.with(|stack| {
            let popped = stack.borrow_mut().pop();
            if let Some(id) = popped {
                debug_assert_eq!(
                    id, self.subscriber_id,
                    "tracking scope mismatch: expected {:?}, got {:?}",
                    self.subscriber_id, id
                );
            }
        });
    }
}
