//! Storefront Design Studio API server library.
//!
//! Exposes config, state, error handling, routes and the session machinery
//! so integration tests and the binary entrypoint can both use them.

pub mod background;
pub mod config;
pub mod copywriter;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod save;
pub mod sessions;
pub mod state;
