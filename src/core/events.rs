//! Store event system for view notifications
//!
//! The EventBus decouples store mutations from whatever re-renders views.
//! It uses `tokio::sync::broadcast`, so any number of subscribers can listen
//! and a store never waits on them.
//!
//! # Architecture
//!
//! ```text
//! ListStore action ──┐
//! VehicleStore ──────┼──▶ EventBus::publish() ──▶ broadcast channel ──▶ view subscribers
//! AuthStore ─────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let bus = EventBus::new(64);
//! let mut rx = bus.subscribe();
//!
//! store.set_search_query("tesla");
//!
//! if let Ok(envelope) = rx.recv().await {
//!     println!("{} {}", envelope.event.resource().unwrap_or("-"), envelope.event.action());
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events raised by a list store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ListEvent {
    /// The derived visible list was recomputed
    VisibleChanged {
        resource: String,
        visible: usize,
        total: usize,
    },
    /// A fetch replaced the authoritative collection
    Replaced { resource: String, count: usize },
    /// An entity was created through the source
    Created {
        resource: String,
        entity_id: String,
        data: serde_json::Value,
    },
    /// An entity was deleted through the source
    Deleted { resource: String, entity_id: String },
    /// A bookmark was added or removed
    BookmarkToggled {
        resource: String,
        entity_id: String,
        bookmarked: bool,
    },
    /// An action failed and filled the error slot
    ErrorRaised {
        resource: String,
        code: String,
        message: String,
    },
    /// The error slot was cleared
    ErrorCleared { resource: String },
}

/// Events raised by the auth store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionEvent {
    SignedIn { user_id: String },
    SignedOut,
    ErrorRaised { code: String, message: String },
}

/// Events raised by the booking ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BookingEvent {
    Created {
        booking_id: String,
        vehicle_id: String,
        total_cost: f64,
    },
    Cancelled { booking_id: String },
}

/// Top-level store event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreEvent {
    List(ListEvent),
    Session(SessionEvent),
    Booking(BookingEvent),
}

impl StoreEvent {
    pub fn event_kind(&self) -> &str {
        match self {
            StoreEvent::List(_) => "list",
            StoreEvent::Session(_) => "session",
            StoreEvent::Booking(_) => "booking",
        }
    }

    /// Resource name of the list store that raised the event
    pub fn resource(&self) -> Option<&str> {
        match self {
            StoreEvent::List(e) => match e {
                ListEvent::VisibleChanged { resource, .. }
                | ListEvent::Replaced { resource, .. }
                | ListEvent::Created { resource, .. }
                | ListEvent::Deleted { resource, .. }
                | ListEvent::BookmarkToggled { resource, .. }
                | ListEvent::ErrorRaised { resource, .. }
                | ListEvent::ErrorCleared { resource } => Some(resource),
            },
            StoreEvent::Session(_) => None,
            StoreEvent::Booking(_) => Some("bookings"),
        }
    }

    /// Action name, e.g. `visible_changed` or `signed_in`
    pub fn action(&self) -> &str {
        match self {
            StoreEvent::List(e) => match e {
                ListEvent::VisibleChanged { .. } => "visible_changed",
                ListEvent::Replaced { .. } => "replaced",
                ListEvent::Created { .. } => "created",
                ListEvent::Deleted { .. } => "deleted",
                ListEvent::BookmarkToggled { .. } => "bookmark_toggled",
                ListEvent::ErrorRaised { .. } => "error_raised",
                ListEvent::ErrorCleared { .. } => "error_cleared",
            },
            StoreEvent::Session(e) => match e {
                SessionEvent::SignedIn { .. } => "signed_in",
                SessionEvent::SignedOut => "signed_out",
                SessionEvent::ErrorRaised { .. } => "error_raised",
            },
            StoreEvent::Booking(e) => match e {
                BookingEvent::Created { .. } => "created",
                BookingEvent::Cancelled { .. } => "cancelled",
            },
        }
    }
}

impl From<ListEvent> for StoreEvent {
    fn from(event: ListEvent) -> Self {
        StoreEvent::List(event)
    }
}

impl From<SessionEvent> for StoreEvent {
    fn from(event: SessionEvent) -> Self {
        StoreEvent::Session(event)
    }
}

impl From<BookingEvent> for StoreEvent {
    fn from(event: BookingEvent) -> Self {
        StoreEvent::Booking(event)
    }
}

/// Envelope wrapping a store event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: StoreEvent,
}

impl EventEnvelope {
    pub fn new(event: StoreEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus shared by stores
///
/// Cheap to clone; clones publish into the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    ///
    /// The capacity determines how many events can be buffered before
    /// slow receivers start losing events (lagged).
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Never fails: without subscribers the event is dropped. Returns the
    /// number of receivers that will see it.
    pub fn publish(&self, event: impl Into<StoreEvent>) -> usize {
        let envelope = EventEnvelope::new(event.into());
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to events published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    /// Get the current number of active subscribers
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
