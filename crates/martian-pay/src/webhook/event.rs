use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::{Map, Value};

use crate::constants::EVENT_OBJECT;
use crate::error::WebhookError;

/// A notification published by Martian Pay when a resource changes state.
#[derive(Debug)]
pub struct Event {
    pub id: String,
    pub object: String,
    pub api_version: String,
    /// Unix seconds.
    pub created: i64,
    /// Symbolic name such as `payment_intent.succeeded`.
    pub event_type: String,
    pub livemode: bool,
    pub pending_webhooks: i64,
    pub data: EventData,
}

/// The resource carried by an event, kept both as a generic mapping and as
/// the exact bytes it arrived as.
#[derive(Debug)]
pub struct EventData {
    pub object: Map<String, Value>,
    /// Changed fields and their prior values; only sent on `*.updated` events.
    pub previous_attributes: Option<Map<String, Value>>,
    pub raw: Box<RawValue>,
}

#[derive(Deserialize)]
struct WireEvent {
    #[serde(default)]
    id: String,
    #[serde(default)]
    object: Option<String>,
    #[serde(default)]
    api_version: String,
    #[serde(default)]
    created: i64,
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    livemode: bool,
    #[serde(default)]
    pending_webhooks: i64,
    #[serde(default)]
    data: Option<WireEventData>,
}

#[derive(Deserialize)]
struct WireEventData {
    #[serde(default)]
    object: Option<Box<RawValue>>,
    #[serde(default)]
    previous_attributes: Option<Map<String, Value>>,
}

impl Event {
    /// Decode an event envelope from the raw request body.
    ///
    /// Call only after the signature has been verified.
    pub fn decode(payload: &[u8]) -> Result<Self, WebhookError> {
        let wire: WireEvent = serde_json::from_slice(payload)?;

        if wire.event_type.is_empty() {
            return Err(WebhookError::Decode("event type is empty".to_string()));
        }
        if wire.created < 0 {
            return Err(WebhookError::Decode(format!(
                "negative created timestamp {}",
                wire.created
            )));
        }
        let object = wire.object.unwrap_or_else(|| EVENT_OBJECT.to_string());
        if object != EVENT_OBJECT {
            return Err(WebhookError::Decode(format!(
                "expected object \"{EVENT_OBJECT}\", got {object:?}"
            )));
        }

        let (raw, previous_attributes) = match wire.data {
            Some(data) => (data.object, data.previous_attributes),
            None => (None, None),
        };
        // An absent resource is carried as `{}`.
        let raw = match raw {
            Some(raw) => raw,
            None => RawValue::from_string("{}".to_string())?,
        };
        // Non-mapping resources keep their raw bytes with an empty mapping.
        let mapping: Map<String, Value> = serde_json::from_str(raw.get()).unwrap_or_default();

        Ok(Self {
            id: wire.id,
            object,
            api_version: wire.api_version,
            created: wire.created,
            event_type: wire.event_type,
            livemode: wire.livemode,
            pending_webhooks: wire.pending_webhooks,
            data: EventData {
                object: mapping,
                previous_attributes,
                raw,
            },
        })
    }

    /// Project the event's resource into a concrete type.
    pub fn project<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        self.data.project()
    }
}

impl EventData {
    /// Deserialize the raw resource bytes into `T`.
    pub fn project<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(self.raw.get())
    }

    pub fn raw_bytes(&self) -> &[u8] {
        self.raw.get().as_bytes()
    }
}

/// Shorthand for [`Event::decode`].
pub fn decode_event(payload: &[u8]) -> Result<Event, WebhookError> {
    Event::decode(payload)
}
