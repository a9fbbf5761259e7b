//! Server-sent event stream of one store's studio events.

use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use tokio_stream::StreamExt;

use crate::state::AppState;

/// GET /stores/{store_id}/events
///
/// Each event is sent with its `event_type` as the SSE event name and the
/// full envelope as JSON data.
pub async fn stream_events(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!(store_id = %store_id, "Event stream opened");

    let stream = state.event_bus.store_stream(&store_id).map(|event| {
        Ok(Event::default()
            .event(event.event_type.clone())
            .data(serde_json::to_string(&event).unwrap_or_default()))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
