//! Studio event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`StudioEvent`]: the event envelope, always scoped to one store.
//! - [`kinds`]: the event type names the studio emits.

pub mod bus;
pub mod kinds;

pub use bus::{EventBus, StudioEvent};
