//! # void_event - Synchronous Event System
//!
//! Typed observer lists with:
//! - One handler list per event type
//! - Priority-based delivery
//! - Immediate, in-call dispatch (no queue)
//!
//! Every handler registered for an event type has run by the time
//! [`EventBus::publish`] returns. Handlers of equal priority run in the
//! order they subscribed.

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;

/// Event priority
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low = 0,
    Normal = 1,
    High = 2,
    Critical = 3,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Normal
    }
}

/// Trait for events
pub trait Event: Send + Sync + 'static {}

// Blanket implementation
impl<T: Send + Sync + 'static> Event for T {}

/// Event handler function type
pub type EventHandler<E> = Box<dyn Fn(&E) + Send + Sync>;

/// Dynamic event handler
pub type DynamicHandler = Box<dyn Fn(&dyn Any) + Send + Sync>;

/// Subscriber ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

struct Subscription {
    id: SubscriberId,
    priority: Priority,
    handler: DynamicHandler,
}

/// Event bus for publishing and subscribing to events
pub struct EventBus {
    /// Handlers per event type, highest priority first
    handlers: BTreeMap<TypeId, Vec<Subscription>>,
    /// Next subscriber ID
    next_subscriber_id: u64,
    /// Number of events published so far
    published: u64,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
            next_subscriber_id: 1,
            published: 0,
        }
    }

    /// Publish an event to every handler subscribed to its type
    pub fn publish<E: Event>(&mut self, event: E) {
        self.published += 1;
        if let Some(handlers) = self.handlers.get(&TypeId::of::<E>()) {
            for subscription in handlers {
                (subscription.handler)(&event);
            }
        }
    }

    /// Subscribe to an event type
    pub fn subscribe<E: Event, F>(&mut self, handler: F) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.subscribe_with_priority::<E, F>(handler, Priority::Normal)
    }

    /// Subscribe with priority
    pub fn subscribe_with_priority<E: Event, F>(
        &mut self,
        handler: F,
        priority: Priority,
    ) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriberId(self.next_subscriber_id);
        self.next_subscriber_id += 1;

        let wrapped_handler: DynamicHandler = Box::new(move |any: &dyn Any| {
            if let Some(event) = any.downcast_ref::<E>() {
                handler(event);
            }
        });

        let handlers = self.handlers.entry(TypeId::of::<E>()).or_default();
        handlers.push(Subscription {
            id,
            priority,
            handler: wrapped_handler,
        });
        // Stable sort keeps subscription order within a priority
        handlers.sort_by(|a, b| b.priority.cmp(&a.priority));

        id
    }

    /// Unsubscribe. Returns true if the subscriber was found.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let mut found = false;
        for handlers in self.handlers.values_mut() {
            let before = handlers.len();
            handlers.retain(|s| s.id != id);
            found |= handlers.len() != before;
        }
        self.handlers.retain(|_, handlers| !handlers.is_empty());
        found
    }

    /// Number of handlers subscribed to `E`
    pub fn handler_count<E: Event>(&self) -> usize {
        self.handlers
            .get(&TypeId::of::<E>())
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Check if anything listens for `E`
    pub fn has_subscribers<E: Event>(&self) -> bool {
        self.handler_count::<E>() > 0
    }

    /// Total events published through this bus
    pub fn published_count(&self) -> u64 {
        self.published
    }

    /// Drop every subscription
    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("event_types", &self.handlers.len())
            .field("published", &self.published)
            .finish()
    }
}

/// Prelude
pub mod prelude {
    pub use crate::{Event, EventBus, EventHandler, Priority, SubscriberId};
}
