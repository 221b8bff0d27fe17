use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::value::RawValue;

use crate::error::WebhookError;
use crate::webhook::Event;

/// Reacts to a verified event. `object` is the exact bytes of `data.object`.
pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &Event, object: &RawValue) -> Result<(), WebhookError>;
}

impl<F> EventHandler for F
where
    F: Fn(&Event, &RawValue) -> Result<(), WebhookError> + Send + Sync,
{
    fn handle(&self, event: &Event, object: &RawValue) -> Result<(), WebhookError> {
        self(event, object)
    }
}

/// A resource type that events of a given type prefix carry.
pub trait EventObject: DeserializeOwned {
    /// Event type prefix including the trailing dot, e.g. `"refund."`.
    const PREFIX: &'static str;
}

struct ObjectHandler<T, F> {
    handler: F,
    _object: PhantomData<fn() -> T>,
}

impl<T, F> EventHandler for ObjectHandler<T, F>
where
    T: EventObject,
    F: Fn(&Event, T) -> Result<(), WebhookError> + Send + Sync,
{
    fn handle(&self, event: &Event, object: &RawValue) -> Result<(), WebhookError> {
        let value: T = serde_json::from_str(object.get())
            .map_err(|e| WebhookError::handler(T::PREFIX, format!("projection failed: {e}")))?;
        (self.handler)(event, value)
    }
}

/// What the dispatcher did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Handled { prefix: String },
    NoHandler,
}

struct Route {
    prefix: String,
    handler: Arc<dyn EventHandler>,
}

/// Routes events to handlers by the longest registered prefix of the event type.
///
/// Routes are kept sorted longest-prefix-first, so `payroll_item.` wins over
/// `payroll.` no matter which was registered first. The table is immutable
/// once built; swap the whole dispatcher to reconfigure.
#[derive(Default)]
pub struct Dispatcher {
    routes: Vec<Route>,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// The prefix that `event_type` would be routed by, if any.
    pub fn route_for(&self, event_type: &str) -> Option<&str> {
        self.find(event_type).map(|r| r.prefix.as_str())
    }

    /// Hand the event's raw resource to the matching handler.
    ///
    /// Unknown event types are accepted and reported as [`Dispatch::NoHandler`].
    pub fn dispatch(&self, event: &Event) -> Result<Dispatch, WebhookError> {
        match self.find(&event.event_type) {
            Some(route) => {
                route.handler.handle(event, &event.data.raw)?;
                Ok(Dispatch::Handled {
                    prefix: route.prefix.clone(),
                })
            }
            None => Ok(Dispatch::NoHandler),
        }
    }

    /// Registered prefixes in match order.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.prefix.as_str())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn find(&self, event_type: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|r| event_type.starts_with(r.prefix.as_str()))
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("prefixes", &self.prefixes().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Default)]
pub struct DispatcherBuilder {
    routes: Vec<Route>,
}

impl DispatcherBuilder {
    /// Register `handler` for every event type starting with `prefix`.
    /// Registering a prefix again replaces its handler.
    pub fn on(mut self, prefix: impl Into<String>, handler: impl EventHandler + 'static) -> Self {
        let prefix = prefix.into();
        self.routes.retain(|r| r.prefix != prefix);
        self.routes.push(Route {
            prefix,
            handler: Arc::new(handler),
        });
        self
    }

    /// Register a closure over the raw resource bytes.
    pub fn on_fn<F>(self, prefix: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Event, &RawValue) -> Result<(), WebhookError> + Send + Sync + 'static,
    {
        self.on(prefix, handler)
    }

    /// Register a typed handler under `T::PREFIX`; the resource is projected into `T` first.
    pub fn on_object<T, F>(self, handler: F) -> Self
    where
        T: EventObject + 'static,
        F: Fn(&Event, T) -> Result<(), WebhookError> + Send + Sync + 'static,
    {
        self.on(
            T::PREFIX,
            ObjectHandler {
                handler,
                _object: PhantomData,
            },
        )
    }

    pub fn build(mut self) -> Dispatcher {
        // Stable sort: equal-length prefixes cannot both match one type unless identical.
        self.routes.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        Dispatcher {
            routes: self.routes,
        }
    }
}
