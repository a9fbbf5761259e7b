//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` across the application.
//! Subscribers either take the raw receiver or a per-store stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use studio_core::types::StoreId;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

// ---------------------------------------------------------------------------
// StudioEvent
// ---------------------------------------------------------------------------

/// Something that happened in one store's studio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioEvent {
    /// Dot-separated event name, see [`crate::kinds`].
    pub event_type: String,

    pub store_id: StoreId,

    /// Event-specific data.
    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl StudioEvent {
    pub fn new(event_type: impl Into<String>, store_id: impl Into<StoreId>) -> Self {
        Self {
            event_type: event_type.into(),
            store_id: store_id.into(),
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// When the buffer is full the oldest unconsumed events are dropped and
/// slow receivers observe `RecvError::Lagged`.
///
/// ```rust
/// use studio_events::bus::{EventBus, StudioEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(StudioEvent::new("page.saved", "store-1"));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<StudioEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers. Dropped when nobody
    /// is listening.
    pub fn publish(&self, event: StudioEvent) {
        tracing::trace!(event_type = %event.event_type, store_id = %event.store_id, "publish");
        // SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StudioEvent> {
        self.sender.subscribe()
    }

    /// Events for one store. Lagged gaps are logged and skipped.
    pub fn store_stream(&self, store_id: &str) -> impl Stream<Item = StudioEvent> + Send + 'static {
        let store_id = store_id.to_string();
        BroadcastStream::new(self.sender.subscribe()).filter_map(move |item| match item {
            Ok(event) if event.store_id == store_id => Some(event),
            Ok(_) => None,
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(store_id = %store_id, skipped, "Event subscriber lagged");
                None
            }
        })
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
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
