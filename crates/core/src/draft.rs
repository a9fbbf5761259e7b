//! The draft layer: a local, uncommitted copy of the store's pages and
//! config that diverges from the last committed state until saved.
//!
//! While the draft is dirty or a save is in flight, externally-driven
//! updates are dropped rather than clobbering local edits.

use crate::error::CoreError;
use crate::page::Page;
use crate::store_config::StoreConfig;

/// The work a single save has to do, captured when the save starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SavePlan {
    /// Draft revision the plan was taken at.
    pub revision: u64,
    /// Pages whose draft differs from the committed copy.
    pub pages: Vec<Page>,
    /// The config, if it differs from the committed copy.
    pub config: Option<StoreConfig>,
}

impl SavePlan {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && self.config.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct DraftLayer {
    pages: Vec<Page>,
    committed: Vec<Page>,
    config: StoreConfig,
    committed_config: StoreConfig,
    dirty: bool,
    saving: bool,
    revision: u64,
}

impl DraftLayer {
    pub fn new(pages: Vec<Page>, config: StoreConfig) -> Self {
        Self {
            committed: pages.clone(),
            pages,
            committed_config: config.clone(),
            config,
            dirty: false,
            saving: false,
            revision: 0,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn committed_pages(&self) -> &[Page] {
        &self.committed
    }

    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == page_id)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }

    /// Mutate one draft page.
    ///
    /// `edit` works on a copy; the draft is only updated (and marked dirty)
    /// when it returns `Ok`.
    pub fn edit_page<R>(
        &mut self,
        page_id: &str,
        edit: impl FnOnce(&mut Page) -> Result<R, CoreError>,
    ) -> Result<R, CoreError> {
        let slot = self
            .pages
            .iter_mut()
            .find(|p| p.id == page_id)
            .ok_or_else(|| CoreError::not_found("Page", page_id))?;

        let mut working = slot.clone();
        let result = edit(&mut working)?;
        *slot = working;
        self.touch();
        Ok(result)
    }

    /// Replace the draft config.
    pub fn set_config(&mut self, config: StoreConfig) {
        self.config = config;
        self.touch();
    }

    /// Overwrite the draft with externally committed state.
    ///
    /// Only happens when there are no unsaved changes and no save in
    /// flight; returns whether the draft was replaced.
    pub fn resync(&mut self, pages: Vec<Page>, config: Option<StoreConfig>) -> bool {
        if self.dirty || self.saving {
            return false;
        }
        self.committed = pages.clone();
        self.pages = pages;
        if let Some(config) = config {
            self.committed_config = config.clone();
            self.config = config;
        }
        true
    }

    /// Start a save. Returns `None` when one is already in flight.
    pub fn begin_save(&mut self) -> Option<SavePlan> {
        if self.saving {
            return None;
        }
        self.saving = true;

        let pages = self
            .pages
            .iter()
            .filter(|draft| {
                self.committed
                    .iter()
                    .find(|c| c.id == draft.id)
                    .map_or(true, |committed| committed != *draft)
            })
            .cloned()
            .collect();
        let config = (self.config != self.committed_config).then(|| self.config.clone());

        Some(SavePlan {
            revision: self.revision,
            pages,
            config,
        })
    }

    /// Record a successful save of `plan`.
    ///
    /// Edits made while the save was in flight keep the draft dirty.
    pub fn complete_save(&mut self, plan: &SavePlan) {
        for saved in &plan.pages {
            match self.committed.iter_mut().find(|c| c.id == saved.id) {
                Some(slot) => *slot = saved.clone(),
                None => self.committed.push(saved.clone()),
            }
        }
        if let Some(config) = &plan.config {
            self.committed_config = config.clone();
        }
        self.saving = false;
        if self.revision == plan.revision {
            self.dirty = false;
        }
    }

    /// Record a failed save; the draft stays dirty so a retry is possible.
    pub fn fail_save(&mut self) {
        self.saving = false;
    }

    /// Add a page that was created directly against the backend.
    pub fn adopt_page(&mut self, page: Page) {
        self.committed.push(page.clone());
        self.pages.push(page);
    }

    /// Drop a page that was deleted directly against the backend.
    pub fn forget_page(&mut self, page_id: &str) -> bool {
        self.committed.retain(|p| p.id != page_id);
        let before = self.pages.len();
        self.pages.retain(|p| p.id != page_id);
        self.pages.len() != before
    }
}
