//! Domain types and the editing engine behind the storefront Design Studio.
//!
//! Everything in this crate is synchronous and in-memory except the
//! [`store::PageStore`] and [`asset::AssetStore`] collaborator traits, which
//! the database crate and the in-process [`store::MemoryPageStore`]
//! implement.

pub mod asset;
pub mod block;
pub mod blocks;
pub mod campaign;
pub mod copy;
pub mod draft;
pub mod error;
pub mod history;
pub mod onboarding;
pub mod page;
pub mod product;
pub mod session;
pub mod shortcuts;
pub mod store;
pub mod store_config;
pub mod types;
