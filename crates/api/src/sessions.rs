//! Registry of open editor sessions.
//!
//! Each [`SessionHandle`] owns one [`EditorSession`] behind a mutex plus the
//! signals its autosave task listens to. The registry is wrapped in `Arc`
//! and shared across the application.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use studio_core::error::CoreError;
use studio_core::session::EditorSession;
use studio_core::types::{new_token, StoreId};
use tokio::sync::{Mutex, Notify, RwLock};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub struct SessionHandle {
    pub id: String,
    pub store_id: StoreId,
    pub session: Mutex<EditorSession>,
    /// Signalled after every edit that leaves the draft dirty.
    pub edited: Notify,
    /// Stops the session's autosave task.
    pub cancel: CancellationToken,
    opened: Instant,
    /// Milliseconds after `opened` of the last request on this session.
    last_active_ms: AtomicU64,
    uploading_logo: AtomicBool,
}

impl SessionHandle {
    pub fn new(session: EditorSession, cancel: CancellationToken) -> Self {
        Self {
            id: new_token(),
            store_id: session.store_id().to_string(),
            session: Mutex::new(session),
            edited: Notify::new(),
            cancel,
            opened: Instant::now(),
            last_active_ms: AtomicU64::new(0),
            uploading_logo: AtomicBool::new(false),
        }
    }

    /// Re-arm the autosave debounce.
    pub fn mark_edited(&self) {
        self.edited.notify_one();
    }

    /// Record activity now.
    pub fn touch(&self) {
        let elapsed = self.opened.elapsed().as_millis() as u64;
        self.last_active_ms.fetch_max(elapsed, Ordering::Relaxed);
    }

    /// Time since the last request on this session.
    pub fn idle_for(&self) -> Duration {
        let last = Duration::from_millis(self.last_active_ms.load(Ordering::Relaxed));
        self.opened.elapsed().saturating_sub(last)
    }

    /// Claim the session's logo upload slot, or `None` if an upload is
    /// already running. The slot is released when the guard drops.
    pub fn begin_logo_upload(&self) -> Option<LogoUploadGuard<'_>> {
        if self.uploading_logo.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(LogoUploadGuard(&self.uploading_logo))
    }
}

pub struct LogoUploadGuard<'a>(&'a AtomicBool);

impl Drop for LogoUploadGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<SessionHandle>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, handle: Arc<SessionHandle>) {
        self.sessions
            .write()
            .await
            .insert(handle.id.clone(), handle);
    }

    /// Look up a session that belongs to `store_id` and mark it active.
    ///
    /// A session id from another store is reported as not found.
    pub async fn get(&self, store_id: &str, session_id: &str) -> Result<Arc<SessionHandle>, CoreError> {
        let handle = self
            .sessions
            .read()
            .await
            .get(session_id)
            .filter(|h| h.store_id == store_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("Session", session_id))?;
        handle.touch();
        Ok(handle)
    }

    pub async fn remove(&self, store_id: &str, session_id: &str) -> Result<Arc<SessionHandle>, CoreError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(session_id) {
            Some(handle) if handle.store_id == store_id => sessions
                .remove(session_id)
                .ok_or_else(|| CoreError::not_found("Session", session_id)),
            _ => Err(CoreError::not_found("Session", session_id)),
        }
    }

    /// All sessions open on one store.
    pub async fn for_store(&self, store_id: &str) -> Vec<Arc<SessionHandle>> {
        self.sessions
            .read()
            .await
            .values()
            .filter(|h| h.store_id == store_id)
            .cloned()
            .collect()
    }

    /// Remove and return sessions with no activity for at least `timeout`.
    pub async fn remove_idle(&self, timeout: Duration) -> Vec<Arc<SessionHandle>> {
        let mut sessions = self.sessions.write().await;
        let idle: Vec<String> = sessions
            .values()
            .filter(|h| h.idle_for() >= timeout)
            .map(|h| h.id.clone())
            .collect();
        idle.iter().filter_map(|id| sessions.remove(id)).collect()
    }

    /// Remove and return every session.
    pub async fn drain(&self) -> Vec<Arc<SessionHandle>> {
        self.sessions.write().await.drain().map(|(_, h)| h).collect()
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
