//! Repository for the `onboarding_flags` table.

use sqlx::PgPool;

use crate::models::onboarding::OnboardingFlagRow;

const COLUMNS: &str = "store_id, flag, dismissed_at";

pub struct OnboardingRepo;

impl OnboardingRepo {
    pub async fn list(pool: &PgPool, store_id: &str) -> Result<Vec<OnboardingFlagRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM onboarding_flags WHERE store_id = $1");
        sqlx::query_as::<_, OnboardingFlagRow>(&query)
            .bind(store_id)
            .fetch_all(pool)
            .await
    }

    /// Record a dismissed flag. Dismissing twice keeps the first timestamp.
    pub async fn dismiss(pool: &PgPool, store_id: &str, flag: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO onboarding_flags (store_id, flag) VALUES ($1, $2) \
             ON CONFLICT (store_id, flag) DO NOTHING",
        )
        .bind(store_id)
        .bind(flag)
        .execute(pool)
        .await?;
        Ok(())
    }
}
