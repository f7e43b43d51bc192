//! # Synchronous event bus with per-topic replay.
//!
//! ```text
//!   publish(msg) ──► [replay ring: topic] ──► handler 1
//!                                       ├──► handler 2   (registration order,
//!                                       └──► handler N    each isolated)
//! ```
//!
//! ## Rules
//! - **Synchronous**: `publish()` returns after every handler ran.
//! - **Bounded replay**: each topic keeps its last `replay_capacity` events.
//! - **Isolation**: a panicking handler is logged and skipped; the rest of
//!   the fan-out continues.
//! - **Re-entrancy**: handlers run with no lock held, so they may publish or
//!   subscribe themselves.

use std::collections::{HashMap, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::error;

use crate::message::{BusEvent, BusMessage, Topic};
use crate::subscription::Subscription;

pub const DEFAULT_REPLAY_CAPACITY: usize = 16;

pub(crate) type Handler = Arc<dyn Fn(&BusEvent) + Send + Sync>;

pub(crate) struct Subscriber {
    pub(crate) id: u64,
    handler: Handler,
}

#[derive(Default)]
pub(crate) struct TopicState {
    pub(crate) subscribers: Vec<Subscriber>,
    replay: VecDeque<BusEvent>,
    published: u64,
}

pub(crate) struct BusInner {
    pub(crate) topics: HashMap<Topic, TopicState>,
    replay_capacity: usize,
    next_subscriber: u64,
    next_sequence: u64,
}

/// Options for [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscribeOptions {
    /// Deliver up to this many buffered events before registering.
    pub replay_last: usize,
}

impl SubscribeOptions {
    pub fn replay(count: usize) -> Self {
        Self { replay_last: count }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicStats {
    pub topic: Topic,
    pub subscribers: usize,
    pub published: u64,
    pub buffered: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BusStats {
    pub total_subscribers: usize,
    pub total_published: u64,
    pub topics: Vec<TopicStats>,
}

/// Publish/subscribe hub. Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Mutex<BusInner>>,
}

impl EventBus {
    /// Create a bus retaining `replay_capacity` events per topic (min 1).
    pub fn new(replay_capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BusInner {
                topics: HashMap::new(),
                replay_capacity: replay_capacity.max(1),
                next_subscriber: 1,
                next_sequence: 1,
            })),
        }
    }

    pub fn replay_capacity(&self) -> usize {
        self.lock().replay_capacity
    }

    /// Publish a message to every current subscriber of its topic.
    ///
    /// Returns the number of handlers that completed without panicking.
    pub fn publish(&self, message: BusMessage) -> usize {
        let (event, handlers) = {
            let mut inner = self.lock();
            let capacity = inner.replay_capacity;
            let sequence = inner.next_sequence;
            inner.next_sequence += 1;

            let event = BusEvent::stamp(sequence, message);
            let state = inner.topics.entry(event.topic).or_default();
            state.published += 1;
            while state.replay.len() >= capacity {
                state.replay.pop_front();
            }
            state.replay.push_back(event.clone());

            let handlers: Vec<Handler> = state
                .subscribers
                .iter()
                .map(|s| Arc::clone(&s.handler))
                .collect();
            (event, handlers)
        };

        handlers
            .iter()
            .filter(|handler| invoke(handler, &event))
            .count()
    }

    /// Register `handler` for `topic`.
    ///
    /// With `replay_last > 0`, the most recent buffered events (oldest first)
    /// are delivered to the handler before this call returns.
    pub fn subscribe<F>(&self, topic: Topic, options: SubscribeOptions, handler: F) -> Subscription
    where
        F: Fn(&BusEvent) + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);

        if options.replay_last > 0 {
            let backlog: Vec<BusEvent> = {
                let inner = self.lock();
                inner
                    .topics
                    .get(&topic)
                    .map(|state| {
                        let skip = state.replay.len().saturating_sub(options.replay_last);
                        state.replay.iter().skip(skip).cloned().collect()
                    })
                    .unwrap_or_default()
            };
            for event in &backlog {
                invoke(&handler, event);
            }
        }

        let id = {
            let mut inner = self.lock();
            let id = inner.next_subscriber;
            inner.next_subscriber += 1;
            inner
                .topics
                .entry(topic)
                .or_default()
                .subscribers
                .push(Subscriber { id, handler });
            id
        };

        Subscription::new(Arc::downgrade(&self.inner), topic, id)
    }

    /// Subscribe to every topic with the same handler.
    pub fn subscribe_all<F>(&self, options: SubscribeOptions, handler: F) -> Vec<Subscription>
    where
        F: Fn(&BusEvent) + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        Topic::ALL
            .into_iter()
            .map(|topic| {
                let h = Arc::clone(&handler);
                self.subscribe(topic, options, move |ev| h(ev))
            })
            .collect()
    }

    /// Forward a topic into an unbounded channel for async consumers.
    pub fn subscribe_channel(
        &self,
        topic: Topic,
        options: SubscribeOptions,
    ) -> (Subscription, mpsc::UnboundedReceiver<BusEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sub = self.subscribe(topic, options, move |ev| {
            let _ = tx.send(ev.clone());
        });
        (sub, rx)
    }

    /// Buffered events, newest first. `None` topic merges every topic.
    pub fn history(&self, topic: Option<Topic>, limit: Option<usize>) -> Vec<BusEvent> {
        let inner = self.lock();
        let mut events: Vec<BusEvent> = match topic {
            Some(t) => inner
                .topics
                .get(&t)
                .map(|s| s.replay.iter().cloned().collect())
                .unwrap_or_default(),
            None => inner
                .topics
                .values()
                .flat_map(|s| s.replay.iter().cloned())
                .collect(),
        };
        events.sort_by(|a, b| b.sequence.cmp(&a.sequence));
        if let Some(limit) = limit {
            events.truncate(limit);
        }
        events
    }

    /// Drop every buffered event. Subscribers are kept.
    pub fn clear_history(&self) {
        let mut inner = self.lock();
        for state in inner.topics.values_mut() {
            state.replay.clear();
        }
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.lock()
            .topics
            .get(&topic)
            .map_or(0, |s| s.subscribers.len())
    }

    pub fn stats(&self) -> BusStats {
        let inner = self.lock();
        let mut topics: Vec<TopicStats> = inner
            .topics
            .iter()
            .map(|(topic, state)| TopicStats {
                topic: *topic,
                subscribers: state.subscribers.len(),
                published: state.published,
                buffered: state.replay.len(),
            })
            .collect();
        topics.sort_by_key(|t| t.topic);

        BusStats {
            total_subscribers: topics.iter().map(|t| t.subscribers).sum(),
            total_published: topics.iter().map(|t| t.published).sum(),
            topics,
        }
    }

    fn lock(&self) -> MutexGuard<'_, BusInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_REPLAY_CAPACITY)
    }
}

/// Run one handler, containing any panic. Returns `true` on success.
fn invoke(handler: &Handler, event: &BusEvent) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
        Ok(()) => true,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic".to_string());
            error!(topic = %event.topic, sequence = event.sequence, %reason, "bus subscriber panicked");
            false
        }
    }
}
