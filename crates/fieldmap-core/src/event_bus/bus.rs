//! The event bus.
//!
//! One bus is created by whoever assembles the components and handed out
//! as `Arc<EventBus>`. Synchronous handlers run on the publishing thread;
//! async consumers (a presentation task, a logger) take a broadcast
//! [`receiver`](EventBus::receiver) instead.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{AppEvent, EventCategory};

/// Events buffered per broadcast receiver before it starts lagging.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.0.simple().to_string();
        write!(f, "sub-{}", &id[..8])
    }
}

/// Which events a handler wants.
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    #[default]
    All,
    /// Any of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    pub fn matches(&self, event: &AppEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

type Handler = Arc<dyn Fn(AppEvent) + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    filter: EventFilter,
    handler: Handler,
}

/// Typed publish/subscribe hub for drawing, object, viewport, and error events.
pub struct EventBus {
    // Registration order is delivery order.
    subscriptions: RwLock<Vec<Subscription>>,
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            subscriptions: RwLock::new(Vec::new()),
            sender,
        }
    }

    /// Delivers `event` to every matching handler, then to the broadcast
    /// receivers. Returns how many handlers and receivers got it.
    ///
    /// Handlers run after the subscription lock is released, so a handler
    /// may subscribe, unsubscribe, or publish again.
    pub fn publish(&self, event: AppEvent) -> usize {
        let matching: Vec<Handler> = self
            .subscriptions
            .read()
            .iter()
            .filter(|s| s.filter.matches(&event))
            .map(|s| Arc::clone(&s.handler))
            .collect();

        tracing::trace!(
            "{} -> {} handler(s)",
            event.description(),
            matching.len()
        );
        for handler in &matching {
            handler(event.clone());
        }

        // Sending fails only when no receiver is alive.
        matching.len() + self.sender.send(event).unwrap_or(0)
    }

    /// Registers a synchronous handler. It runs on the publishing thread
    /// and should return quickly.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(AppEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(Uuid::new_v4());
        self.subscriptions.write().push(Subscription {
            id,
            filter,
            handler: Arc::new(handler),
        });
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Removes a handler. False when `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.write();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        let removed = subscriptions.len() < before;
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// A receiver for consuming events from an async task.
    pub fn receiver(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Registered handlers (broadcast receivers not included).
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.read().len()
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
            .field("handlers", &self.subscriber_count())
            .field("receivers", &self.sender.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FeatureId;
    use crate::event_bus::events::{DrawingEvent, ObjectEvent};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn removed(id: &str) -> AppEvent {
        AppEvent::Drawing(DrawingEvent::FeatureRemoved {
            id: FeatureId::new(id),
        })
    }

    fn updated(sequence: u64) -> AppEvent {
        AppEvent::Objects(ObjectEvent::ObjectSetUpdated { sequence, count: 0 })
    }

    #[test]
    fn test_unsubscribe_twice() {
        let bus = EventBus::new();
        let id = bus.subscribe(EventFilter::All, |_| {});
        assert_eq!(bus.subscriber_count(), 1);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_publish_counts_deliveries() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(removed("feat-1")), 0);

        bus.subscribe(EventFilter::All, |_| {});
        let _receiver = bus.receiver();
        assert_eq!(bus.publish(removed("feat-1")), 2);
    }

    #[test]
    fn test_category_filter() {
        let bus = EventBus::new();
        let drawing = Arc::new(AtomicUsize::new(0));
        let objects = Arc::new(AtomicUsize::new(0));

        let d = Arc::clone(&drawing);
        bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Drawing]),
            move |_| {
                d.fetch_add(1, Ordering::SeqCst);
            },
        );
        let o = Arc::clone(&objects);
        bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Objects]),
            move |_| {
                o.fetch_add(1, Ordering::SeqCst);
            },
        );

        bus.publish(removed("feat-1"));
        bus.publish(updated(1));
        bus.publish(updated(2));

        assert_eq!(drawing.load(Ordering::SeqCst), 1);
        assert_eq!(objects.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            bus.subscribe(EventFilter::All, move |_| order.lock().push(tag));
        }

        bus.publish(updated(7));

        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_handler_may_unsubscribe_itself() {
        let bus = Arc::new(EventBus::new());
        let own_id = Arc::new(Mutex::new(None::<SubscriptionId>));

        let handler_bus = Arc::clone(&bus);
        let handler_id = Arc::clone(&own_id);
        let id = bus.subscribe(EventFilter::All, move |_| {
            if let Some(id) = handler_id.lock().take() {
                handler_bus.unsubscribe(id);
            }
        });
        *own_id.lock() = Some(id);

        bus.publish(updated(1));

        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.publish(updated(2)), 0);
    }

    #[test]
    fn test_handler_may_subscribe_and_publish() {
        let bus = Arc::new(EventBus::new());
        let seen = Arc::new(AtomicUsize::new(0));

        let handler_bus = Arc::clone(&bus);
        let handler_seen = Arc::clone(&seen);
        bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Drawing]),
            move |_| {
                let seen = Arc::clone(&handler_seen);
                handler_bus.subscribe(
                    EventFilter::Categories(vec![EventCategory::Objects]),
                    move |_| {
                        seen.fetch_add(1, Ordering::SeqCst);
                    },
                );
                handler_bus.publish(updated(3));
            },
        );

        bus.publish(removed("feat-2"));

        assert_eq!(bus.subscriber_count(), 2);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_filter_matches() {
        let event = removed("feat-9");

        assert!(EventFilter::All.matches(&event));
        assert!(EventFilter::Categories(vec![EventCategory::Drawing]).matches(&event));
        assert!(!EventFilter::Categories(vec![EventCategory::Objects]).matches(&event));
    }

    #[test]
    fn test_subscription_id_display() {
        let bus = EventBus::new();
        let id = bus.subscribe(EventFilter::All, |_| {});
        let shown = id.to_string();
        assert!(shown.starts_with("sub-"));
        assert_eq!(shown.len(), 12);
    }

    #[tokio::test]
    async fn test_receiver_gets_published_events() {
        let bus = EventBus::new();
        let mut receiver = bus.receiver();

        bus.publish(updated(42));

        match receiver.recv().await {
            Ok(AppEvent::Objects(ObjectEvent::ObjectSetUpdated { sequence, .. })) => {
                assert_eq!(sequence, 42)
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
