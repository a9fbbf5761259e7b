//! Periodic cleanup of abandoned editor sessions.
//!
//! A session that has seen no requests for the idle timeout is removed from
//! the registry, its autosave task is stopped, and unsaved changes get one
//! last save. Runs on a fixed interval using `tokio::time::interval`.

use std::time::Duration;

use serde_json::json;
use studio_events::{kinds, StudioEvent};

use crate::save::close_session;
use crate::state::AppState;

/// Run the sweep loop until the application shuts down.
pub async fn run(state: AppState, idle_timeout: Duration, every: Duration) {
    tracing::info!(
        idle_timeout_secs = idle_timeout.as_secs(),
        interval_secs = every.as_secs(),
        "Session sweep started"
    );

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = state.shutdown.cancelled() => {
                tracing::info!("Session sweep stopping");
                break;
            }
            _ = interval.tick() => {
                let closed = sweep_idle(&state, idle_timeout).await;
                if closed > 0 {
                    tracing::info!(closed, "Session sweep: closed idle sessions");
                } else {
                    tracing::debug!("Session sweep: no idle sessions");
                }
            }
        }
    }
}

/// Close every session idle for at least `idle_timeout`. Returns how many
/// were closed.
pub async fn sweep_idle(state: &AppState, idle_timeout: Duration) -> usize {
    let idle = state.sessions.remove_idle(idle_timeout).await;
    for handle in &idle {
        let save = close_session(state, handle).await;
        tracing::info!(
            session_id = %handle.id,
            store_id = %handle.store_id,
            idle_secs = handle.idle_for().as_secs(),
            ?save,
            "Idle editor session closed"
        );
        state.event_bus.publish(
            StudioEvent::new(kinds::SESSION_EXPIRED, &handle.store_id).with_payload(json!({
                "session_id": handle.id,
                "save": save,
            })),
        );
    }
    idle.len()
}
