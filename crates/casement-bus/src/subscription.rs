use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, Weak};

use crate::bus::BusInner;
use crate::message::Topic;

/// Handle returned by [`EventBus::subscribe`](crate::EventBus::subscribe).
///
/// Dropping it does not unsubscribe; call [`Subscription::unsubscribe`].
pub struct Subscription {
    bus: Weak<Mutex<BusInner>>,
    topic: Topic,
    id: u64,
    active: AtomicBool,
}

impl Subscription {
    pub(crate) fn new(bus: Weak<Mutex<BusInner>>, topic: Topic, id: u64) -> Self {
        Self {
            bus,
            topic,
            id,
            active: AtomicBool::new(true),
        }
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Deregister the handler. Returns `true` only on the call that removed it.
    pub fn unsubscribe(&self) -> bool {
        if !self.active.swap(false, Ordering::SeqCst) {
            return false;
        }
        let Some(bus) = self.bus.upgrade() else {
            return false;
        };
        let mut inner = bus.lock().unwrap_or_else(|e| e.into_inner());
        match inner.topics.get_mut(&self.topic) {
            Some(state) => {
                let before = state.subscribers.len();
                state.subscribers.retain(|s| s.id != self.id);
                state.subscribers.len() != before
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
