//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`QueueEvent`]s. It is
//! designed to be shared via `Arc<EventBus>` across the application; dropping
//! the bus closes the channel, which is how subscriber loops learn to shut
//! down.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartqueue_core::types::{DbId, LocationId};
use tokio::sync::broadcast;

/// Dot-separated event name constants.
pub mod names {
    /// A location was created by an admin.
    pub const LOCATION_CREATED: &str = "location.created";
    /// A location's fields or occupancy changed.
    pub const LOCATION_UPDATED: &str = "location.updated";
    /// A location was deleted by an admin.
    pub const LOCATION_DELETED: &str = "location.deleted";
    /// The demo simulator rewrote occupancy across the registry.
    pub const LOCATIONS_SIMULATED: &str = "locations.simulated";
    /// A queue ticket was created.
    pub const TICKET_CREATED: &str = "ticket.created";
    /// A queue ticket was cancelled.
    pub const TICKET_CANCELLED: &str = "ticket.cancelled";
    /// A user checked in at a location.
    pub const CHECKIN_CREATED: &str = "checkin.created";
    /// A user exited a location.
    pub const CHECKIN_COMPLETED: &str = "checkin.completed";
    /// A user's counters or location pointer changed.
    pub const PROFILE_UPDATED: &str = "profile.updated";
}

// ---------------------------------------------------------------------------
// QueueEvent
// ---------------------------------------------------------------------------

/// A domain event that occurred on the platform.
///
/// Constructed via [`QueueEvent::new`] and enriched with the builder methods
/// [`with_location`](QueueEvent::with_location),
/// [`with_actor`](QueueEvent::with_actor), and
/// [`with_payload`](QueueEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEvent {
    /// Dot-separated event name, e.g. `"checkin.created"`.
    pub event_type: String,

    /// Location the event concerns, if any.
    pub location_id: Option<LocationId>,

    /// Id of the user that triggered the event, if any.
    pub actor_user_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl QueueEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            location_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the affected location to the event.
    pub fn with_location(mut self, location_id: impl Into<LocationId>) -> Self {
        self.location_id = Some(location_id.into());
        self
    }

    /// Attach the acting user to the event.
    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// True for events that change what a location snapshot would contain.
    pub fn affects_locations(&self) -> bool {
        self.event_type.starts_with("location.") || self.event_type.starts_with("locations.")
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`QueueEvent`].
pub struct EventBus {
    sender: broadcast::Sender<QueueEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: QueueEvent) {
        // Ignore the SendError; it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
