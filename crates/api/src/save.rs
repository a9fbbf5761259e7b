//! The save routine shared by autosave, manual save and shutdown.
//!
//! The session lock is held only to take the plan and to record the result,
//! never across store calls, so edits can continue while a save is in
//! flight.

use serde::Serialize;
use serde_json::json;
use studio_core::error::CoreError;
use studio_core::page::PageUpdate;
use studio_core::session::{EditorSession, Toast};
use studio_events::{kinds, StudioEvent};

use crate::sessions::SessionHandle;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaveOutcome {
    Saved { pages: usize, config: bool },
    /// Another save was already in flight.
    Skipped,
    Failed { error: String },
}

/// Drain the session's toasts and publish each one on the bus.
pub fn flush_toasts(state: &AppState, session_id: &str, session: &mut EditorSession) -> Vec<Toast> {
    let toasts = session.drain_toasts();
    for toast in &toasts {
        state.event_bus.publish(
            StudioEvent::new(kinds::STUDIO_TOAST, session.store_id()).with_payload(json!({
                "session_id": session_id,
                "level": toast.level,
                "message": toast.message,
            })),
        );
    }
    toasts
}

/// Write the session's changed pages and config to the store.
///
/// On the first failure the draft stays dirty, an error toast is queued and
/// `page.save_failed` is published.
pub async fn save_session(state: &AppState, handle: &SessionHandle) -> SaveOutcome {
    let Some(plan) = handle.session.lock().await.begin_save() else {
        tracing::debug!(session_id = %handle.id, "Save already in flight, skipping");
        return SaveOutcome::Skipped;
    };

    let result: Result<(), CoreError> = async {
        for page in &plan.pages {
            state
                .store
                .update_page(&handle.store_id, &page.id, &PageUpdate::from(page))
                .await?;
        }
        if let Some(config) = &plan.config {
            state.store.save_config(&handle.store_id, config).await?;
        }
        Ok(())
    }
    .await;

    let mut session = handle.session.lock().await;
    match result {
        Ok(()) => {
            session.complete_save(&plan);
            // Edits made while the save was in flight were skipped by the
            // debounce loop; re-arm it so they are not stranded.
            if session.is_dirty() {
                handle.mark_edited();
            }
            if !plan.is_empty() {
                tracing::info!(
                    session_id = %handle.id,
                    store_id = %handle.store_id,
                    pages = plan.pages.len(),
                    config = plan.config.is_some(),
                    "Draft saved"
                );
                state.event_bus.publish(
                    StudioEvent::new(kinds::PAGE_SAVED, &handle.store_id).with_payload(json!({
                        "session_id": handle.id,
                        "page_ids": plan.pages.iter().map(|p| &p.id).collect::<Vec<_>>(),
                        "config": plan.config.is_some(),
                    })),
                );
            }
            SaveOutcome::Saved {
                pages: plan.pages.len(),
                config: plan.config.is_some(),
            }
        }
        Err(err) => {
            tracing::error!(
                session_id = %handle.id,
                store_id = %handle.store_id,
                error = %err,
                "Failed to save draft"
            );
            session.fail_save(&err);
            state.event_bus.publish(
                StudioEvent::new(kinds::PAGE_SAVE_FAILED, &handle.store_id).with_payload(json!({
                    "session_id": handle.id,
                    "error": err.to_string(),
                })),
            );
            SaveOutcome::Failed {
                error: err.to_string(),
            }
        }
    }
}

/// Stop a removed session's autosave, give it a last save if it has
/// unsaved changes, and flush its toasts.
///
/// Returns `None` when there was nothing to save.
pub async fn close_session(state: &AppState, handle: &SessionHandle) -> Option<SaveOutcome> {
    handle.cancel.cancel();

    let dirty = handle.session.lock().await.is_dirty();
    let outcome = if dirty {
        Some(save_session(state, handle).await)
    } else {
        None
    };
    flush_toasts(state, &handle.id, &mut *handle.session.lock().await);
    outcome
}

/// Stop every session's autosave and give dirty sessions a final save.
///
/// Returns how many sessions were saved successfully.
pub async fn close_all_sessions(state: &AppState) -> usize {
    state.shutdown.cancel();

    let mut saved = 0;
    for handle in state.sessions.drain().await {
        match close_session(state, &handle).await {
            Some(SaveOutcome::Saved { .. }) => saved += 1,
            Some(outcome) => {
                tracing::warn!(session_id = %handle.id, ?outcome, "Final save did not complete");
            }
            None => {}
        }
    }
    saved
}
