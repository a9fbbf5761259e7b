/// Tenant (store) identifier. Every page, config and product belongs to one.
pub type StoreId = String;

/// Page identifiers are opaque random tokens.
pub type PageId = String;

/// Block identifiers are opaque random tokens, stable across moves and edits.
pub type BlockId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh random identifier token.
pub fn new_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
