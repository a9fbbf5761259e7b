//! `store_configs` table rows.

use sqlx::types::Json;
use sqlx::FromRow;
use studio_core::store_config::StoreConfig;
use studio_core::types::{StoreId, Timestamp};

/// A row from the `store_configs` table. The whole config is one JSONB
/// document so unknown keys survive a round trip.
#[derive(Debug, Clone, FromRow)]
pub struct StoreConfigRow {
    pub store_id: StoreId,
    pub config: Json<StoreConfig>,
    pub updated_at: Timestamp,
}
