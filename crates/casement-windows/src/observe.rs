//! Mirrors bus traffic into the structured logger.

use casement_bus::{EventBus, SubscribeOptions, Subscription};
use casement_log::Logger;
use serde_json::json;

/// Log every bus event at debug level under `<namespace>.bus`.
pub fn bridge_bus_to_logger(bus: &EventBus, log: &Logger) -> Vec<Subscription> {
    let log = log.child("bus", json!({}));
    bus.subscribe_all(SubscribeOptions::default(), move |event| {
        log.debug(
            event.topic.as_str(),
            json!({
                "sequence": event.sequence,
                "payload": event.payload,
            }),
        );
    })
}
