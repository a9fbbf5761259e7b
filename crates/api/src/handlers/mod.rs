//! Request handlers, one module per resource.
//!
//! Every handler takes `State<AppState>` plus the `{store_id}` path segment
//! and returns [`AppResult`](crate::error::AppResult) wrapped in the
//! `{ "data": ... }` envelope.

pub mod assets;
pub mod campaigns;
pub mod config;
pub mod events;
pub mod onboarding;
pub mod pages;
pub mod products;
pub mod studio;
