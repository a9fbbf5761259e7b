//! Debounced autosave for one editor session.
//!
//! Every edit re-arms the timer. When the session has been quiet for the
//! debounce period and is dirty with no save in flight, the save routine
//! runs. There is no retry beyond the next edit re-arming the timer.

use std::sync::Arc;
use std::time::Duration;

use crate::save::{flush_toasts, save_session};
use crate::sessions::SessionHandle;
use crate::state::AppState;

/// Run the autosave loop until the session's token is cancelled.
pub async fn run(state: AppState, handle: Arc<SessionHandle>, debounce: Duration) {
    tracing::debug!(
        session_id = %handle.id,
        debounce_ms = debounce.as_millis() as u64,
        "Autosave started"
    );

    loop {
        tokio::select! {
            _ = handle.cancel.cancelled() => break,
            _ = handle.edited.notified() => {}
        }

        // Quiet period: every further edit restarts the wait.
        loop {
            tokio::select! {
                _ = handle.cancel.cancelled() => {
                    tracing::debug!(session_id = %handle.id, "Autosave stopping");
                    return;
                }
                _ = handle.edited.notified() => continue,
                _ = tokio::time::sleep(debounce) => break,
            }
        }

        let due = {
            let session = handle.session.lock().await;
            session.is_dirty() && !session.is_saving()
        };
        if !due {
            continue;
        }

        save_session(&state, &handle).await;
        let mut session = handle.session.lock().await;
        flush_toasts(&state, &handle.id, &mut session);
    }

    tracing::debug!(session_id = %handle.id, "Autosave stopping");
}
