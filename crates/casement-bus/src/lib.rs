//! Typed publish/subscribe hub for shell lifecycle notifications.
//!
//! - Topics form a closed set ([`Topic`]); each carries exactly one payload
//!   shape ([`BusMessage`]).
//! - `publish` fans out synchronously, in subscriber registration order.
//! - Every topic keeps a bounded replay ring so late subscribers can catch up
//!   on the most recent events.
//! - A panicking subscriber is isolated: later subscribers still receive the
//!   event and the replay ring is untouched.

pub mod bus;
pub mod message;
pub mod subscription;

pub use bus::{BusStats, EventBus, SubscribeOptions, TopicStats, DEFAULT_REPLAY_CAPACITY};
pub use message::{BusEvent, BusMessage, Topic, UnknownTopic};
pub use subscription::Subscription;
