//! Page blocks: the sections a storefront page is composed of.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::types::{new_token, BlockId};

/// Maximum length (in characters) of a block heading.
pub const MAX_HEADING_CHARS: usize = 200;

/// Maximum length (in characters) of a block's display name.
pub const MAX_BLOCK_NAME_CHARS: usize = 80;

/// Suffix appended to the name of a duplicated block.
pub const COPY_SUFFIX: &str = " (Copy)";

// ---------------------------------------------------------------------------
// BlockKind
// ---------------------------------------------------------------------------

/// The section kind a block renders as.
///
/// `Section` is free-form HTML content; every `System*` kind is rendered by a
/// component library that reads the block's [`BlockData`] and `variant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Section,
    SystemHero,
    SystemGrid,
    SystemFooter,
    SystemScroll,
    SystemSocial,
    SystemRichText,
    SystemEmail,
    SystemCollapsible,
    SystemLogoList,
    SystemPromo,
    SystemGallery,
    SystemBlog,
    SystemVideo,
    SystemContact,
    SystemLayout,
    SystemCollection,
}

impl BlockKind {
    pub const ALL: [BlockKind; 17] = [
        BlockKind::Section,
        BlockKind::SystemHero,
        BlockKind::SystemGrid,
        BlockKind::SystemFooter,
        BlockKind::SystemScroll,
        BlockKind::SystemSocial,
        BlockKind::SystemRichText,
        BlockKind::SystemEmail,
        BlockKind::SystemCollapsible,
        BlockKind::SystemLogoList,
        BlockKind::SystemPromo,
        BlockKind::SystemGallery,
        BlockKind::SystemBlog,
        BlockKind::SystemVideo,
        BlockKind::SystemContact,
        BlockKind::SystemLayout,
        BlockKind::SystemCollection,
    ];

    /// The wire tag, e.g. `"system-hero"`.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Section => "section",
            BlockKind::SystemHero => "system-hero",
            BlockKind::SystemGrid => "system-grid",
            BlockKind::SystemFooter => "system-footer",
            BlockKind::SystemScroll => "system-scroll",
            BlockKind::SystemSocial => "system-social",
            BlockKind::SystemRichText => "system-rich-text",
            BlockKind::SystemEmail => "system-email",
            BlockKind::SystemCollapsible => "system-collapsible",
            BlockKind::SystemLogoList => "system-logo-list",
            BlockKind::SystemPromo => "system-promo",
            BlockKind::SystemGallery => "system-gallery",
            BlockKind::SystemBlog => "system-blog",
            BlockKind::SystemVideo => "system-video",
            BlockKind::SystemContact => "system-contact",
            BlockKind::SystemLayout => "system-layout",
            BlockKind::SystemCollection => "system-collection",
        }
    }

    /// Name given to a freshly added block when the caller supplies none.
    pub fn default_name(self) -> &'static str {
        match self {
            BlockKind::Section => "Custom Section",
            BlockKind::SystemHero => "Hero",
            BlockKind::SystemGrid => "Product Grid",
            BlockKind::SystemFooter => "Footer",
            BlockKind::SystemScroll => "Scrolling Banner",
            BlockKind::SystemSocial => "Social Feed",
            BlockKind::SystemRichText => "Rich Text",
            BlockKind::SystemEmail => "Email Signup",
            BlockKind::SystemCollapsible => "Collapsible Content",
            BlockKind::SystemLogoList => "Logo List",
            BlockKind::SystemPromo => "Promo Banner",
            BlockKind::SystemGallery => "Gallery",
            BlockKind::SystemBlog => "Blog Posts",
            BlockKind::SystemVideo => "Video",
            BlockKind::SystemContact => "Contact Form",
            BlockKind::SystemLayout => "Layout",
            BlockKind::SystemCollection => "Collection",
        }
    }
}

// ---------------------------------------------------------------------------
// BlockData
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Padding {
    None,
    S,
    M,
    L,
    Xl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// Presentation overrides shared by every block kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<Padding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_width: Option<bool>,
}

/// Content payload of a block.
///
/// The fields every variant understands are typed; variant-specific keys
/// (slide lists, column counts, ...) live in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<BlockStyle>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BlockData {
    /// Shallow-merge `patch` over this payload and return the result.
    ///
    /// Keys in the patch replace existing keys wholesale; a `null` value
    /// removes the key. The merged payload is re-validated against the typed
    /// fields, so `{"heading": 5}` is rejected.
    pub fn merged(&self, patch: &Map<String, Value>) -> Result<BlockData, CoreError> {
        let mut merged = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            Ok(_) => Map::new(),
            Err(e) => return Err(CoreError::Internal(format!("Block data encoding: {e}"))),
        };

        for (key, value) in patch {
            if value.is_null() {
                merged.remove(key);
            } else {
                merged.insert(key.clone(), value.clone());
            }
        }

        let data: BlockData = serde_json::from_value(Value::Object(merged))
            .map_err(|e| CoreError::Validation(format!("Invalid block data: {e}")))?;
        data.validate()?;
        Ok(data)
    }

    /// Enforce field limits on the payload.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(heading) = &self.heading {
            let len = heading.chars().count();
            if len > MAX_HEADING_CHARS {
                return Err(CoreError::Validation(format!(
                    "Heading is too long ({len} characters, maximum {MAX_HEADING_CHARS})"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// A single section on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub name: String,
    /// HTML for `section` blocks; ignored by system blocks.
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default)]
    pub data: BlockData,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub locked: bool,
}

impl Block {
    /// Create an empty, visible, unlocked block with a fresh id.
    pub fn new(kind: BlockKind, name: impl Into<String>) -> Self {
        Self {
            id: new_token(),
            kind,
            name: name.into(),
            content: String::new(),
            variant: None,
            data: BlockData::default(),
            hidden: false,
            locked: false,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn with_data(mut self, data: BlockData) -> Self {
        self.data = data;
        self
    }

    /// Copy this block under a fresh id. The copy is never locked.
    pub fn duplicate(&self) -> Block {
        Block {
            id: new_token(),
            name: format!("{}{COPY_SUFFIX}", self.name),
            locked: false,
            ..self.clone()
        }
    }

    /// Reject edits to a locked block.
    pub fn ensure_unlocked(&self) -> Result<(), CoreError> {
        if self.locked {
            Err(CoreError::Conflict(format!(
                "Block '{}' is locked",
                self.name
            )))
        } else {
            Ok(())
        }
    }
}

/// Validate a block display name.
pub fn validate_block_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Block name must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_BLOCK_NAME_CHARS {
        return Err(CoreError::Validation(format!(
            "Block name must be at most {MAX_BLOCK_NAME_CHARS} characters"
        )));
    }
    Ok(())
}

/// Caller-supplied fields for a block added from the section library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBlock {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub data: BlockData,
}

impl NewBlock {
    pub fn of_kind(kind: BlockKind) -> Self {
        Self {
            kind,
            name: None,
            content: String::new(),
            variant: None,
            data: BlockData::default(),
        }
    }

    /// Validate and materialize into a [`Block`] with a fresh id.
    pub fn into_block(self) -> Result<Block, CoreError> {
        let name = self
            .name
            .unwrap_or_else(|| self.kind.default_name().to_string());
        validate_block_name(&name)?;
        self.data.validate()?;
        Ok(Block {
            id: new_token(),
            kind: self.kind,
            name: name.trim().to_string(),
            content: self.content,
            variant: self.variant,
            data: self.data,
            hidden: false,
            locked: false,
        })
    }
}
