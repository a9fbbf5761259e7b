//! Event type names.

/// A save wrote the draft to the backend.
pub const PAGE_SAVED: &str = "page.saved";

/// A save failed; the draft stays dirty.
pub const PAGE_SAVE_FAILED: &str = "page.save_failed";

pub const PAGE_CREATED: &str = "page.created";

pub const PAGE_DELETED: &str = "page.deleted";

pub const CONFIG_SAVED: &str = "config.saved";

/// A toast raised by an editor session.
pub const STUDIO_TOAST: &str = "studio.toast";

pub const ASSET_UPLOADED: &str = "asset.uploaded";

pub const ASSET_DELETED: &str = "asset.deleted";

/// An idle session was closed by the sweeper.
pub const SESSION_EXPIRED: &str = "session.expired";
