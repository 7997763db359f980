#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Event bus shared by the Spark behavior controllers.
//!
//! The bus is single-threaded and synchronous: `publish` runs every
//! subscriber to completion, in subscription order, before returning. This
//! mirrors DOM event dispatch, where each handler finishes before the next
//! event is delivered. Subscriptions detach when their handle is dropped.

pub mod payloads;
pub mod topics;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

pub use payloads::{Event, EventEnvelope, EventId};

type Handler = Rc<RefCell<Box<dyn FnMut(&EventEnvelope)>>>;

struct BusInner {
    next_id: Cell<EventId>,
    next_subscriber: Cell<u64>,
    last_event_id: Cell<Option<EventId>>,
    subscribers: RefCell<Vec<(u64, Handler)>>,
}

/// Shared publish/subscribe channel. Cloning yields another handle to the same bus.
#[derive(Clone)]
pub struct EventBus {
    inner: Rc<BusInner>,
}

impl EventBus {
    /// Construct an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(BusInner {
                next_id: Cell::new(1),
                next_subscriber: Cell::new(1),
                last_event_id: Cell::new(None),
                subscribers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Publish an event to every current subscriber, assigning it a sequential identifier.
    ///
    /// Subscribers added while the event is being delivered do not see it. A
    /// subscriber that publishes from inside its own handler does not receive
    /// the nested event.
    #[must_use]
    pub fn publish(&self, event: Event) -> EventId {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.last_event_id.set(Some(id));
        let envelope = EventEnvelope { id, event };

        let handlers: Vec<Handler> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        trace!(
            event_id = id,
            kind = envelope.event.kind(),
            subscribers = handlers.len(),
            "publishing event"
        );
        for handler in handlers {
            if let Ok(mut handler) = handler.try_borrow_mut() {
                handler(&envelope);
            } else {
                trace!(event_id = id, "skipping re-entrant subscriber");
            }
        }
        id
    }

    /// Register a handler invoked for every subsequently published event.
    #[must_use = "dropping the subscription detaches the handler"]
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: FnMut(&EventEnvelope) + 'static,
    {
        let id = self.inner.next_subscriber.get();
        self.inner.next_subscriber.set(id + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(RefCell::new(Box::new(handler)))));
        Subscription {
            bus: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Returns the last assigned identifier, if any events have been published.
    #[must_use]
    pub fn last_event_id(&self) -> Option<EventId> {
        self.inner.last_event_id.get()
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
            .field("subscribers", &self.subscriber_count())
            .field("last_event_id", &self.last_event_id())
            .finish()
    }
}

/// Handle keeping a bus subscription alive.
#[derive(Debug)]
pub struct Subscription {
    bus: Weak<BusInner>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.subscribers.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}
