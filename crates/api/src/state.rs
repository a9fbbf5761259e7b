use std::sync::Arc;

use studio_core::asset::AssetStore;
use studio_core::copy::CopyGenerator;
use studio_core::error::CoreError;
use studio_core::store::PageStore;
use studio_events::EventBus;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;
use crate::sessions::SessionRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Persistence collaborator (Postgres or in-memory).
    pub store: Arc<dyn PageStore>,
    /// Uploaded media; the same backend as `store`.
    pub assets: Arc<dyn AssetStore>,
    /// Database pool when running against Postgres; used by the health check.
    pub pool: Option<studio_db::DbPool>,
    pub config: Arc<ServerConfig>,
    /// Open editor sessions.
    pub sessions: Arc<SessionRegistry>,
    pub event_bus: Arc<EventBus>,
    pub copy_generator: Arc<dyn CopyGenerator>,
    /// Cancelled on shutdown; parent of every autosave task's token.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Offer the store's committed pages and config to every open session.
    ///
    /// Sessions with unsaved changes or a save in flight drop the update.
    /// Returns how many sessions took it.
    pub async fn resync_sessions(&self, store_id: &str) -> Result<usize, CoreError> {
        let handles = self.sessions.for_store(store_id).await;
        if handles.is_empty() {
            return Ok(0);
        }

        let pages = self.store.list_pages(store_id).await?;
        let config = self.store.get_config(store_id).await?;

        let mut applied = 0;
        for handle in handles {
            if handle
                .session
                .lock()
                .await
                .resync(pages.clone(), config.clone())
            {
                applied += 1;
            } else {
                tracing::debug!(session_id = %handle.id, "Session has local changes, resync dropped");
            }
        }
        Ok(applied)
    }
}
