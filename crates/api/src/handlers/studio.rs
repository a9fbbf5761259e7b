//! Handlers for Design Studio editor sessions.
//!
//! A session holds one merchant's draft of a store. Every response carries
//! a [`SessionView`]; building the view drains the session's toasts, which
//! are also published on the event bus.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use studio_core::asset::Asset;
use studio_core::copy::CopyRequest;
use studio_core::error::CoreError;
use studio_core::onboarding::OnboardingFlags;
use studio_core::page::Page;
use studio_core::session::{AdminTab, CommandOutcome, EditorSession, StudioCommand, Toast};
use studio_core::shortcuts::{KeyChord, ShortcutAction};
use studio_core::store_config::StoreConfig;

use crate::background::autosave;
use crate::handlers::assets::{read_upload, store_upload};
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::save::{flush_toasts, save_session, SaveOutcome};
use crate::sessions::SessionHandle;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Views and DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub store_id: String,
    pub tab: AdminTab,
    pub active_page_id: Option<String>,
    pub selected_block_id: Option<String>,
    pub pages: Vec<Page>,
    pub config: StoreConfig,
    pub dirty: bool,
    pub saving: bool,
    pub can_undo: bool,
    pub can_redo: bool,
    pub history_len: usize,
    pub history_index: usize,
    pub toasts: Vec<Toast>,
}

impl SessionView {
    fn capture(state: &AppState, handle: &SessionHandle, session: &mut EditorSession) -> Self {
        let toasts = flush_toasts(state, &handle.id, session);
        Self {
            session_id: handle.id.clone(),
            store_id: handle.store_id.clone(),
            tab: session.tab(),
            active_page_id: session.active_page_id().map(str::to_string),
            selected_block_id: session.selected_block_id().map(str::to_string),
            pages: session.pages().to_vec(),
            config: session.config().clone(),
            dirty: session.is_dirty(),
            saving: session.is_saving(),
            can_undo: session.can_undo(),
            can_redo: session.can_redo(),
            history_len: session.history().len(),
            history_index: session.history().index(),
            toasts,
        }
    }
}

async fn view(state: &AppState, handle: &SessionHandle) -> SessionView {
    let mut session = handle.session.lock().await;
    SessionView::capture(state, handle, &mut session)
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenSession {
    #[serde(default)]
    pub tab: Option<AdminTab>,
    #[serde(default)]
    pub page_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OpenSessionResponse {
    #[serde(flatten)]
    pub session: SessionView,
    pub onboarding: OnboardingFlags,
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub outcome: CommandOutcome,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct KeyResponse {
    pub action: Option<ShortcutAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save: Option<SaveOutcome>,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub save: SaveOutcome,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub applied: bool,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct CopyResponse {
    pub generated: bool,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct LogoResponse {
    pub asset: Asset,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct CloseResponse {
    pub session_id: String,
    pub save: Option<SaveOutcome>,
}

// ---------------------------------------------------------------------------
// POST /stores/{store_id}/studio/sessions
// ---------------------------------------------------------------------------

/// Open an editor session on the store's committed pages and config, and
/// start its autosave task.
pub async fn open_session(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Json(input): Json<OpenSession>,
) -> AppResult<impl IntoResponse> {
    let pages = state.store.list_pages(&store_id).await?;
    let config = state.store.get_config(&store_id).await?.unwrap_or_default();
    let onboarding = state.store.onboarding_flags(&store_id).await?;

    let mut session = EditorSession::open(&store_id, pages, config);
    if let Some(tab) = input.tab {
        session.apply(StudioCommand::SetTab { tab })?;
    }
    if let Some(page_id) = input.page_id {
        session.apply(StudioCommand::SetActivePage { page_id })?;
    }

    let handle = Arc::new(SessionHandle::new(session, state.shutdown.child_token()));
    state.sessions.insert(Arc::clone(&handle)).await;
    tokio::spawn(autosave::run(
        state.clone(),
        Arc::clone(&handle),
        state.config.autosave_debounce(),
    ));

    tracing::info!(store_id = %store_id, session_id = %handle.id, "Editor session opened");

    let session = view(&state, &handle).await;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: OpenSessionResponse {
                session,
                onboarding,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// GET /stores/{store_id}/studio/sessions/{session_id}
// ---------------------------------------------------------------------------

pub async fn get_session(
    State(state): State<AppState>,
    Path((store_id, session_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let handle = state.sessions.get(&store_id, &session_id).await?;
    Ok(Json(DataResponse {
        data: view(&state, &handle).await,
    }))
}

// ---------------------------------------------------------------------------
// DELETE /stores/{store_id}/studio/sessions/{session_id}
// ---------------------------------------------------------------------------

/// Close a session. Unsaved changes get one last save attempt.
pub async fn close_session(
    State(state): State<AppState>,
    Path((store_id, session_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let handle = state.sessions.remove(&store_id, &session_id).await?;
    let save = crate::save::close_session(&state, &handle).await;

    tracing::info!(store_id = %store_id, session_id = %session_id, "Editor session closed");
    Ok(Json(DataResponse {
        data: CloseResponse { session_id, save },
    }))
}

// ---------------------------------------------------------------------------
// POST /stores/{store_id}/studio/sessions/{session_id}/commands
// ---------------------------------------------------------------------------

pub async fn apply_command(
    State(state): State<AppState>,
    Path((store_id, session_id)): Path<(String, String)>,
    Json(command): Json<StudioCommand>,
) -> AppResult<impl IntoResponse> {
    let handle = state.sessions.get(&store_id, &session_id).await?;
    let mut session = handle.session.lock().await;

    let outcome = session.apply(command)?;
    if outcome.changed && session.is_dirty() {
        handle.mark_edited();
    }

    let session = SessionView::capture(&state, &handle, &mut session);
    Ok(Json(DataResponse {
        data: CommandResponse { outcome, session },
    }))
}

// ---------------------------------------------------------------------------
// POST /stores/{store_id}/studio/sessions/{session_id}/keys
// ---------------------------------------------------------------------------

/// Handle a keyboard chord. Undo/redo apply directly; save runs the save
/// routine immediately.
pub async fn handle_key(
    State(state): State<AppState>,
    Path((store_id, session_id)): Path<(String, String)>,
    Json(chord): Json<KeyChord>,
) -> AppResult<impl IntoResponse> {
    let handle = state.sessions.get(&store_id, &session_id).await?;

    let action = {
        let mut session = handle.session.lock().await;
        let action = session.handle_key(&chord)?;
        if matches!(action, Some(ShortcutAction::Undo | ShortcutAction::Redo)) && session.is_dirty()
        {
            handle.mark_edited();
        }
        action
    };

    let save = match action {
        Some(ShortcutAction::Save) => Some(save_session(&state, &handle).await),
        _ => None,
    };

    Ok(Json(DataResponse {
        data: KeyResponse {
            action,
            save,
            session: view(&state, &handle).await,
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /stores/{store_id}/studio/sessions/{session_id}/save
// ---------------------------------------------------------------------------

pub async fn save(
    State(state): State<AppState>,
    Path((store_id, session_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let handle = state.sessions.get(&store_id, &session_id).await?;
    let save = save_session(&state, &handle).await;
    Ok(Json(DataResponse {
        data: SaveResponse {
            save,
            session: view(&state, &handle).await,
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /stores/{store_id}/studio/sessions/{session_id}/refresh
// ---------------------------------------------------------------------------

/// Pull the committed state from the store. Dropped while the session has
/// unsaved changes or a save in flight.
pub async fn refresh(
    State(state): State<AppState>,
    Path((store_id, session_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let handle = state.sessions.get(&store_id, &session_id).await?;
    let pages = state.store.list_pages(&store_id).await?;
    let config = state.store.get_config(&store_id).await?;

    let mut session = handle.session.lock().await;
    let applied = session.resync(pages, config);
    let session = SessionView::capture(&state, &handle, &mut session);
    Ok(Json(DataResponse {
        data: RefreshResponse { applied, session },
    }))
}

// ---------------------------------------------------------------------------
// POST /stores/{store_id}/studio/sessions/{session_id}/blocks/{block_id}/generate-copy
// ---------------------------------------------------------------------------

/// Ask the copy generator for text and write it into one field of a block
/// on the active page. Generation failures leave the block unchanged and
/// report `generated: false`.
pub async fn generate_copy(
    State(state): State<AppState>,
    Path((store_id, session_id, block_id)): Path<(String, String, String)>,
    Json(request): Json<CopyRequest>,
) -> AppResult<impl IntoResponse> {
    request.validate()?;
    let handle = state.sessions.get(&store_id, &session_id).await?;

    {
        let session = handle.session.lock().await;
        let on_page = session
            .active_page()
            .is_some_and(|p| p.block_index(&block_id).is_some());
        if !on_page {
            return Err(CoreError::not_found("Block", block_id).into());
        }
    }

    let text = match state.copy_generator.generate(&request.prompt).await {
        Ok(text) => Some(text),
        Err(err) => {
            tracing::warn!(
                session_id = %handle.id,
                block_id = %block_id,
                error = %err,
                "Copy generation failed"
            );
            None
        }
    };

    let mut session = handle.session.lock().await;
    let generated = match text {
        Some(text) => {
            session.apply(StudioCommand::UpdateBlockData {
                block_id,
                data: request.patch(&text),
            })?;
            handle.mark_edited();
            true
        }
        None => false,
    };

    let session = SessionView::capture(&state, &handle, &mut session);
    Ok(Json(DataResponse {
        data: CopyResponse { generated, session },
    }))
}

// ---------------------------------------------------------------------------
// POST /stores/{store_id}/studio/sessions/{session_id}/logo
// ---------------------------------------------------------------------------

/// Upload a logo image and point the draft config's `logoUrl` at it.
///
/// The config change is an ordinary edit (history, dirty, autosave). Only
/// one logo upload per session may run at a time; a second one is a
/// conflict. A failed upload leaves the draft unchanged.
pub async fn upload_logo(
    State(state): State<AppState>,
    Path((store_id, session_id)): Path<(String, String)>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let handle = state.sessions.get(&store_id, &session_id).await?;
    let asset = {
        let _uploading = handle
            .begin_logo_upload()
            .ok_or_else(|| CoreError::Conflict("A logo upload is already in progress".into()))?;
        let upload = read_upload(multipart).await?;
        store_upload(&state, &store_id, upload).await?
    };

    let mut session = handle.session.lock().await;
    let mut config = session.config().clone();
    config.logo_url = Some(asset.url.clone());
    let outcome = session.apply(StudioCommand::UpdateConfig { config })?;
    if outcome.changed && session.is_dirty() {
        handle.mark_edited();
    }

    let session = SessionView::capture(&state, &handle, &mut session);
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: LogoResponse { asset, session },
        }),
    ))
}
