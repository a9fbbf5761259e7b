//! `onboarding_flags` table rows.

use sqlx::FromRow;
use studio_core::types::{StoreId, Timestamp};

/// A dismissed flag. `flag` holds the storage key, e.g. `evolv_seen_welcome`.
#[derive(Debug, Clone, FromRow)]
pub struct OnboardingFlagRow {
    pub store_id: StoreId,
    pub flag: String,
    pub dismissed_at: Timestamp,
}
