//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async queries that
//! accept `&PgPool` as the first argument. Every query is scoped by
//! `store_id`.

pub mod asset_repo;
pub mod onboarding_repo;
pub mod page_repo;
pub mod product_repo;
pub mod store_config_repo;

pub use asset_repo::AssetRepo;
pub use onboarding_repo::OnboardingRepo;
pub use page_repo::PageRepo;
pub use product_repo::ProductRepo;
pub use store_config_repo::StoreConfigRepo;
