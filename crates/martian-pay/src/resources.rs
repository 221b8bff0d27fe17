//! Resources carried inside webhook events.
//!
//! Amounts are decimal strings exactly as the API sends them. Status fields
//! are plain strings so new states never break decoding.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::{Map, Value};

use crate::error::WebhookError;
use crate::webhook::{Event, EventObject};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub livemode: bool,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Refund {
    pub id: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub payment_intent: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub id: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub status: String,
    /// Receiving wallet address or bank account reference.
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// A batch payout run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payroll {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub total_amount: String,
    #[serde(default)]
    pub item_count: i64,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// One recipient line inside a [`Payroll`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollItem {
    pub id: String,
    #[serde(default)]
    pub payroll: Option<String>,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub created: i64,
}

impl EventObject for PaymentIntent {
    const PREFIX: &'static str = "payment_intent.";
}

impl EventObject for Refund {
    const PREFIX: &'static str = "refund.";
}

impl EventObject for Payout {
    const PREFIX: &'static str = "payout.";
}

impl EventObject for Payroll {
    const PREFIX: &'static str = "payroll.";
}

impl EventObject for PayrollItem {
    const PREFIX: &'static str = "payroll_item.";
}

/// Resource families that events are published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    PaymentIntent,
    Refund,
    Payout,
    PayrollItem,
    Payroll,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::PaymentIntent,
        ResourceKind::Refund,
        ResourceKind::Payout,
        ResourceKind::PayrollItem,
        ResourceKind::Payroll,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            ResourceKind::PaymentIntent => PaymentIntent::PREFIX,
            ResourceKind::Refund => Refund::PREFIX,
            ResourceKind::Payout => Payout::PREFIX,
            ResourceKind::PayrollItem => PayrollItem::PREFIX,
            ResourceKind::Payroll => Payroll::PREFIX,
        }
    }

    /// Longest-prefix classification of an event type.
    pub fn classify(event_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .filter(|kind| event_type.starts_with(kind.prefix()))
            .max_by_key(|kind| kind.prefix().len())
    }
}

/// A resource projected from an event's raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    PaymentIntent(PaymentIntent),
    Refund(Refund),
    Payout(Payout),
    PayrollItem(PayrollItem),
    Payroll(Payroll),
}

impl Resource {
    pub fn project(kind: ResourceKind, raw: &RawValue) -> Result<Self, WebhookError> {
        fn decode<T: EventObject>(raw: &RawValue) -> Result<T, WebhookError> {
            serde_json::from_str(raw.get())
                .map_err(|e| WebhookError::handler(T::PREFIX, format!("projection failed: {e}")))
        }

        Ok(match kind {
            ResourceKind::PaymentIntent => Resource::PaymentIntent(decode(raw)?),
            ResourceKind::Refund => Resource::Refund(decode(raw)?),
            ResourceKind::Payout => Resource::Payout(decode(raw)?),
            ResourceKind::PayrollItem => Resource::PayrollItem(decode(raw)?),
            ResourceKind::Payroll => Resource::Payroll(decode(raw)?),
        })
    }

    /// Classify and project; `Ok(None)` for event types with no known resource.
    pub fn from_event(event: &Event) -> Result<Option<Self>, WebhookError> {
        ResourceKind::classify(&event.event_type)
            .map(|kind| Self::project(kind, &event.data.raw))
            .transpose()
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::PaymentIntent(_) => ResourceKind::PaymentIntent,
            Resource::Refund(_) => ResourceKind::Refund,
            Resource::Payout(_) => ResourceKind::Payout,
            Resource::PayrollItem(_) => ResourceKind::PayrollItem,
            Resource::Payroll(_) => ResourceKind::Payroll,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Resource::PaymentIntent(r) => &r.id,
            Resource::Refund(r) => &r.id,
            Resource::Payout(r) => &r.id,
            Resource::PayrollItem(r) => &r.id,
            Resource::Payroll(r) => &r.id,
        }
    }
}
