use std::fmt;

use super::{Event, EventKind};

/// Handle returned by [`EventManager::subscribe`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&Event)>;

struct Subscription {
    id: SubscriptionId,
    kind: EventKind,
    callback: Callback,
}

/// Synchronous publish/subscribe keyed by [`EventKind`].
///
/// Callbacks run on the calling thread, in subscription order.
#[derive(Default)]
pub struct EventManager {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F) -> SubscriptionId
    where
        F: FnMut(&Event) + 'static,
    {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscriptions.push(Subscription {
            id,
            kind,
            callback: Box::new(callback),
        });
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Delivers `event` to every subscriber of its kind.
    pub fn call_event(&mut self, event: &Event) {
        let kind = event.kind();
        for sub in self.subscriptions.iter_mut().filter(|s| s.kind == kind) {
            (sub.callback)(event);
        }
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscriptions.iter().filter(|s| s.kind == kind).count()
    }

    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }
}

impl fmt::Debug for EventManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventManager")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}
