//! Uploaded media assets (logos, block images).
//!
//! Asset bytes are stored by the [`AssetStore`] collaborator and served back
//! under a stable per-store URL, which is what block data and the store
//! config reference.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{new_token, Timestamp};

/// Largest accepted upload.
pub const MAX_ASSET_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Model,
    Video,
}

impl AssetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Model => "model",
            AssetKind::Video => "video",
        }
    }

    /// Classify a MIME type, or `None` if uploads of it are not accepted.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type {
            "image/png" | "image/jpeg" | "image/gif" | "image/webp" | "image/svg+xml" => {
                Some(AssetKind::Image)
            }
            "video/mp4" | "video/webm" => Some(AssetKind::Video),
            "model/gltf-binary" | "model/gltf+json" => Some(AssetKind::Model),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub kind: AssetKind,
    pub content_type: String,
    pub size: i64,
    pub url: String,
    pub created_at: Timestamp,
}

/// Public path an asset's bytes are served from.
pub fn asset_url(store_id: &str, asset_id: &str) -> String {
    format!("/api/v1/stores/{store_id}/assets/{asset_id}/content")
}

/// Guess a MIME type from a file extension.
pub fn content_type_for(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    Some(match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "glb" => "model/gltf-binary",
        "gltf" => "model/gltf+json",
        _ => return None,
    })
}

/// An upload as received from a client.
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub file_name: String,
    /// Declared MIME type; the file extension is used when absent.
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl NewAsset {
    /// Validate the upload and assign it an id and URL under `store_id`.
    pub fn into_asset(self, store_id: &str) -> Result<(Asset, Vec<u8>), CoreError> {
        let name = self.file_name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("Asset file name must not be empty".into()));
        }
        if self.data.is_empty() {
            return Err(CoreError::Validation("Asset file is empty".into()));
        }
        if self.data.len() > MAX_ASSET_BYTES {
            return Err(CoreError::Validation(format!(
                "Asset exceeds the {} MiB limit",
                MAX_ASSET_BYTES / (1024 * 1024)
            )));
        }

        let content_type = self
            .content_type
            .filter(|ct| !ct.is_empty() && ct != "application/octet-stream")
            .or_else(|| content_type_for(name).map(str::to_string))
            .ok_or_else(|| {
                CoreError::Validation(format!("Cannot determine the type of '{name}'"))
            })?;
        let kind = AssetKind::from_content_type(&content_type).ok_or_else(|| {
            CoreError::Validation(format!("Unsupported asset type '{content_type}'"))
        })?;

        let id = new_token();
        let asset = Asset {
            url: asset_url(store_id, &id),
            id,
            name: name.to_string(),
            kind,
            content_type,
            size: self.data.len() as i64,
            created_at: chrono::Utc::now(),
        };
        Ok((asset, self.data))
    }
}

/// Storage for uploaded asset bytes, scoped by store.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn upload_asset(&self, store_id: &str, asset: &Asset, data: &[u8])
        -> Result<Asset, CoreError>;

    /// Newest first.
    async fn list_assets(&self, store_id: &str) -> Result<Vec<Asset>, CoreError>;

    async fn asset_content(
        &self,
        store_id: &str,
        asset_id: &str,
    ) -> Result<Option<(Asset, Vec<u8>)>, CoreError>;

    /// Returns `true` if an asset was removed.
    async fn delete_asset(&self, store_id: &str, asset_id: &str) -> Result<bool, CoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn upload(name: &str, content_type: Option<&str>, len: usize) -> NewAsset {
        NewAsset {
            file_name: name.into(),
            content_type: content_type.map(str::to_string),
            data: vec![7; len],
        }
    }

    #[test]
    fn extension_fills_in_missing_content_type() {
        let (asset, data) = upload("logo.PNG", None, 10).into_asset("s1").unwrap();
        assert_eq!(asset.content_type, "image/png");
        assert_eq!(asset.kind, AssetKind::Image);
        assert_eq!(asset.size, 10);
        assert_eq!(data.len(), 10);
        assert_eq!(asset.url, format!("/api/v1/stores/s1/assets/{}/content", asset.id));
    }

    #[test]
    fn octet_stream_falls_back_to_extension() {
        let (asset, _) = upload("spin.glb", Some("application/octet-stream"), 4)
            .into_asset("s1")
            .unwrap();
        assert_eq!(asset.kind, AssetKind::Model);
    }

    #[test]
    fn rejects_empty_oversized_and_unknown() {
        assert_matches!(upload("a.png", None, 0).into_asset("s1"), Err(CoreError::Validation(_)));
        assert_matches!(
            upload("a.png", None, MAX_ASSET_BYTES + 1).into_asset("s1"),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            upload("notes.txt", Some("text/plain"), 3).into_asset("s1"),
            Err(CoreError::Validation(_))
        );
        assert_matches!(upload("README", None, 3).into_asset("s1"), Err(CoreError::Validation(_)));
    }
}
