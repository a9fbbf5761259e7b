//! Storefront pages and their create/update DTOs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use crate::block::{Block, BlockKind};
use crate::error::CoreError;
use crate::types::{new_token, PageId};

/// Title given to a page created without one.
pub const DEFAULT_PAGE_TITLE: &str = "New Page";

/// Slug given to a page created without one.
pub const DEFAULT_PAGE_SLUG: &str = "/new-page";

/// Content of the intro block seeded into a new page.
pub const INTRO_BLOCK_CONTENT: &str = "<p>Start writing your story here...</p>";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Home,
    #[default]
    Custom,
}

impl PageType {
    pub fn as_str(self) -> &'static str {
        match self {
            PageType::Home => "home",
            PageType::Custom => "custom",
        }
    }
}

/// What a navigation entry for the page points at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    #[default]
    Page,
    Products,
    Collections,
    Contact,
    External,
}

impl LinkType {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkType::Page => "page",
            LinkType::Products => "products",
            LinkType::Collections => "collections",
            LinkType::Contact => "contact",
            LinkType::External => "external",
        }
    }
}

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let valid = slug.starts_with('/')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '/');
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("slug")
            .with_message("slug must start with '/' and use only a-z, 0-9, '-' and '/'".into()))
    }
}

/// A storefront page: an ordered list of blocks plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Page {
    pub id: PageId,
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,
    #[serde(rename = "type", default)]
    pub page_type: PageType,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub link_type: LinkType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub external_url: Option<String>,
}

impl Page {
    /// Run field validation plus the cross-field link rules.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        if self.link_type == LinkType::External && self.external_url.is_none() {
            return Err(CoreError::Validation(
                "external_url is required for external links".into(),
            ));
        }
        for block in &self.blocks {
            block.data.validate()?;
        }
        Ok(())
    }

    /// Apply the provided fields of `update`, leaving the rest untouched.
    pub fn apply_update(&mut self, update: &PageUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(slug) = &update.slug {
            self.slug = slug.clone();
        }
        if let Some(page_type) = update.page_type {
            self.page_type = page_type;
        }
        if let Some(blocks) = &update.blocks {
            self.blocks = blocks.clone();
        }
        if let Some(metadata) = &update.metadata {
            self.metadata = metadata.clone();
        }
        if let Some(order) = update.display_order {
            self.display_order = order;
        }
        if let Some(link_type) = update.link_type {
            self.link_type = link_type;
        }
        if let Some(url) = &update.external_url {
            self.external_url = if url.is_empty() { None } else { Some(url.clone()) };
        }
    }

    /// Position of the block with `block_id`, if present.
    pub fn block_index(&self, block_id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == block_id)
    }
}

/// DTO for creating a page. Missing fields fall back to the "Add Page"
/// defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPage {
    pub title: Option<String>,
    pub slug: Option<String>,
    #[serde(rename = "type")]
    pub page_type: Option<PageType>,
    pub blocks: Option<Vec<Block>>,
    pub metadata: Option<Map<String, Value>>,
    pub display_order: Option<i32>,
    pub link_type: Option<LinkType>,
    pub external_url: Option<String>,
}

impl NewPage {
    /// Materialize into a validated [`Page`] with a fresh id.
    pub fn into_page(self) -> Result<Page, CoreError> {
        let blocks = self.blocks.unwrap_or_else(|| {
            vec![Block::new(BlockKind::Section, "Intro Text").with_content(INTRO_BLOCK_CONTENT)]
        });
        let page = Page {
            id: new_token(),
            title: self.title.unwrap_or_else(|| DEFAULT_PAGE_TITLE.into()),
            slug: self.slug.unwrap_or_else(|| DEFAULT_PAGE_SLUG.into()),
            page_type: self.page_type.unwrap_or_default(),
            blocks,
            metadata: self.metadata.unwrap_or_default(),
            display_order: self.display_order.unwrap_or_default(),
            link_type: self.link_type.unwrap_or_default(),
            external_url: self.external_url,
        };
        page.check()?;
        Ok(page)
    }
}

/// DTO for replacing page fields. All fields are optional; the draft save
/// path always sends the full set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageUpdate {
    pub title: Option<String>,
    pub slug: Option<String>,
    #[serde(rename = "type")]
    pub page_type: Option<PageType>,
    pub blocks: Option<Vec<Block>>,
    pub metadata: Option<Map<String, Value>>,
    pub display_order: Option<i32>,
    pub link_type: Option<LinkType>,
    /// An empty string clears the URL.
    pub external_url: Option<String>,
}

impl From<&Page> for PageUpdate {
    fn from(page: &Page) -> Self {
        Self {
            title: Some(page.title.clone()),
            slug: Some(page.slug.clone()),
            page_type: Some(page.page_type),
            blocks: Some(page.blocks.clone()),
            metadata: Some(page.metadata.clone()),
            display_order: Some(page.display_order),
            link_type: Some(page.link_type),
            external_url: Some(page.external_url.clone().unwrap_or_default()),
        }
    }
}
