//! The editor session: one merchant's Design Studio state for one store.
//!
//! Every change arrives as a [`StudioCommand`]. Mutations go through the
//! draft layer (marking it dirty) and, while the Design tab is active, are
//! recorded in the undo history. The host drains [`Toast`]s after each call
//! and drives saving through [`EditorSession::begin_save`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::block::NewBlock;
use crate::blocks::{self, Direction};
use crate::draft::{DraftLayer, SavePlan};
use crate::error::CoreError;
use crate::history::{History, Snapshot};
use crate::page::{Page, PageType, PageUpdate};
use crate::shortcuts::{self, KeyChord, ShortcutAction};
use crate::store_config::StoreConfig;
use crate::types::{BlockId, PageId, StoreId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminTab {
    #[default]
    Dashboard,
    Products,
    Orders,
    Design,
    Marketing,
    Settings,
}

// ---------------------------------------------------------------------------
// Toasts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

/// A transient user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum StudioCommand {
    AddBlock {
        block: NewBlock,
        #[serde(default)]
        after: Option<BlockId>,
    },
    DeleteBlock {
        block_id: BlockId,
    },
    MoveBlock {
        index: usize,
        direction: Direction,
    },
    ReorderBlock {
        from: usize,
        to: usize,
    },
    DuplicateBlock {
        block_id: BlockId,
    },
    ToggleHidden {
        block_id: BlockId,
    },
    ToggleLocked {
        block_id: BlockId,
    },
    RenameBlock {
        block_id: BlockId,
        name: String,
    },
    UpdateBlockData {
        block_id: BlockId,
        data: Map<String, Value>,
    },
    UpdateBlockContent {
        block_id: BlockId,
        content: String,
    },
    SetVariant {
        block_id: BlockId,
        #[serde(default)]
        variant: Option<String>,
    },
    SelectBlock {
        #[serde(default)]
        block_id: Option<BlockId>,
    },
    UpdateConfig {
        config: StoreConfig,
    },
    UpdatePageProperties {
        update: PageUpdate,
    },
    SetActivePage {
        page_id: PageId,
    },
    SetTab {
        tab: AdminTab,
    },
    Undo,
    Redo,
}

/// What a command did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    /// Whether the draft (or history position) changed.
    pub changed: bool,
    /// Id of a block the command created, for add/duplicate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<BlockId>,
}

impl CommandOutcome {
    fn changed(changed: bool) -> Self {
        Self {
            changed,
            block_id: None,
        }
    }

    fn created(block_id: BlockId) -> Self {
        Self {
            changed: true,
            block_id: Some(block_id),
        }
    }
}

// ---------------------------------------------------------------------------
// EditorSession
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct EditorSession {
    store_id: StoreId,
    tab: AdminTab,
    active_page_id: Option<PageId>,
    selected_block_id: Option<BlockId>,
    draft: DraftLayer,
    history: History,
    toasts: Vec<Toast>,
}

fn initial_page(pages: &[Page]) -> Option<PageId> {
    pages
        .iter()
        .find(|p| p.page_type == PageType::Home)
        .or_else(|| pages.first())
        .map(|p| p.id.clone())
}

impl EditorSession {
    /// Open a session on the Design tab, with the home page (or the first
    /// page) active and the history seeded with the current state.
    pub fn open(store_id: impl Into<StoreId>, pages: Vec<Page>, config: StoreConfig) -> Self {
        let active_page_id = initial_page(&pages);
        let mut session = Self {
            store_id: store_id.into(),
            tab: AdminTab::Design,
            active_page_id,
            selected_block_id: None,
            draft: DraftLayer::new(pages, config.clone()),
            history: History::new(Snapshot {
                blocks: Vec::new(),
                config,
            }),
            toasts: Vec::new(),
        };
        session.history.reset(session.snapshot());
        session
    }

    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    pub fn tab(&self) -> AdminTab {
        self.tab
    }

    pub fn active_page_id(&self) -> Option<&str> {
        self.active_page_id.as_deref()
    }

    pub fn active_page(&self) -> Option<&Page> {
        self.active_page_id
            .as_deref()
            .and_then(|id| self.draft.page(id))
    }

    pub fn selected_block_id(&self) -> Option<&str> {
        self.selected_block_id.as_deref()
    }

    pub fn pages(&self) -> &[Page] {
        self.draft.pages()
    }

    pub fn config(&self) -> &StoreConfig {
        self.draft.config()
    }

    pub fn draft(&self) -> &DraftLayer {
        &self.draft
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_dirty(&self) -> bool {
        self.draft.is_dirty()
    }

    pub fn is_saving(&self) -> bool {
        self.draft.is_saving()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Take all pending toasts.
    pub fn drain_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    fn toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toasts.push(Toast {
            level,
            message: message.into(),
        });
    }

    /// The `{blocks, config}` value history tracks.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            blocks: self
                .active_page()
                .map(|p| p.blocks.clone())
                .unwrap_or_default(),
            config: self.draft.config().clone(),
        }
    }

    fn record(&mut self) {
        if self.tab == AdminTab::Design {
            let snapshot = self.snapshot();
            self.history.record(snapshot);
        }
    }

    fn active_id(&self) -> Result<PageId, CoreError> {
        self.active_page_id
            .clone()
            .ok_or_else(|| CoreError::Validation("No active page".into()))
    }

    /// Run a mutation against the active page's block list, then record it.
    fn edit_blocks<R>(
        &mut self,
        edit: impl FnOnce(&mut Vec<crate::block::Block>) -> Result<R, CoreError>,
    ) -> Result<R, CoreError> {
        let page_id = self.active_id()?;
        let result = self.draft.edit_page(&page_id, |page| edit(&mut page.blocks))?;
        self.record();
        Ok(result)
    }

    /// Apply one command.
    pub fn apply(&mut self, command: StudioCommand) -> Result<CommandOutcome, CoreError> {
        match command {
            StudioCommand::AddBlock { block, after } => {
                let block = block.into_block()?;
                let id = block.id.clone();
                self.edit_blocks(|blocks| Ok(blocks::insert(blocks, block, after.as_deref())))?;
                self.selected_block_id = Some(id.clone());
                Ok(CommandOutcome::created(id))
            }
            StudioCommand::DeleteBlock { block_id } => {
                self.edit_blocks(|blocks| blocks::remove(blocks, &block_id))?;
                if self.selected_block_id.as_deref() == Some(block_id.as_str()) {
                    self.selected_block_id = None;
                }
                Ok(CommandOutcome::changed(true))
            }
            StudioCommand::MoveBlock { index, direction } => {
                let page_id = self.active_id()?;
                let len = self.draft.page(&page_id).map_or(0, |p| p.blocks.len());
                let movable = match direction {
                    Direction::Up => index > 0 && index < len,
                    Direction::Down => index + 1 < len,
                };
                if !movable {
                    return Ok(CommandOutcome::changed(false));
                }
                self.edit_blocks(|blocks| Ok(blocks::move_by_one(blocks, index, direction)))
                    .map(CommandOutcome::changed)
            }
            StudioCommand::ReorderBlock { from, to } => {
                let page_id = self.active_id()?;
                let len = self.draft.page(&page_id).map_or(0, |p| p.blocks.len());
                if from == to || from >= len || to >= len {
                    return Ok(CommandOutcome::changed(false));
                }
                self.edit_blocks(|blocks| Ok(blocks::reorder(blocks, from, to)))
                    .map(CommandOutcome::changed)
            }
            StudioCommand::DuplicateBlock { block_id } => {
                let id = self.edit_blocks(|blocks| blocks::duplicate(blocks, &block_id))?;
                self.selected_block_id = Some(id.clone());
                Ok(CommandOutcome::created(id))
            }
            StudioCommand::ToggleHidden { block_id } => {
                self.edit_blocks(|blocks| blocks::toggle_hidden(blocks, &block_id))?;
                Ok(CommandOutcome::changed(true))
            }
            StudioCommand::ToggleLocked { block_id } => {
                self.edit_blocks(|blocks| blocks::toggle_locked(blocks, &block_id))?;
                Ok(CommandOutcome::changed(true))
            }
            StudioCommand::RenameBlock { block_id, name } => {
                self.edit_blocks(|blocks| blocks::rename(blocks, &block_id, &name))?;
                Ok(CommandOutcome::changed(true))
            }
            StudioCommand::UpdateBlockData { block_id, data } => {
                self.edit_blocks(|blocks| blocks::update_data(blocks, &block_id, &data))?;
                Ok(CommandOutcome::changed(true))
            }
            StudioCommand::UpdateBlockContent { block_id, content } => {
                self.edit_blocks(|blocks| blocks::update_content(blocks, &block_id, &content))?;
                Ok(CommandOutcome::changed(true))
            }
            StudioCommand::SetVariant { block_id, variant } => {
                self.edit_blocks(|blocks| {
                    blocks::set_variant(blocks, &block_id, variant.as_deref())
                })?;
                Ok(CommandOutcome::changed(true))
            }
            StudioCommand::SelectBlock { block_id } => {
                if let Some(id) = &block_id {
                    let exists = self
                        .active_page()
                        .is_some_and(|p| p.block_index(id).is_some());
                    if !exists {
                        return Err(CoreError::not_found("Block", id.clone()));
                    }
                }
                self.selected_block_id = block_id;
                Ok(CommandOutcome::changed(false))
            }
            StudioCommand::UpdateConfig { config } => {
                config.validate()?;
                self.draft.set_config(config);
                self.record();
                Ok(CommandOutcome::changed(true))
            }
            StudioCommand::UpdatePageProperties { update } => {
                let page_id = self.active_id()?;
                self.draft.edit_page(&page_id, |page| {
                    page.apply_update(&update);
                    page.check()
                })?;
                self.record();
                Ok(CommandOutcome::changed(true))
            }
            StudioCommand::SetActivePage { page_id } => {
                if self.draft.page(&page_id).is_none() {
                    return Err(CoreError::not_found("Page", page_id));
                }
                let changed = self.active_page_id.as_deref() != Some(page_id.as_str());
                if changed {
                    self.active_page_id = Some(page_id);
                    self.selected_block_id = None;
                    self.history.reset(self.snapshot());
                }
                Ok(CommandOutcome::changed(changed))
            }
            StudioCommand::SetTab { tab } => {
                self.tab = tab;
                Ok(CommandOutcome::changed(false))
            }
            StudioCommand::Undo => self.undo().map(CommandOutcome::changed),
            StudioCommand::Redo => self.redo().map(CommandOutcome::changed),
        }
    }

    /// Resolve a key press. Undo and redo are applied here; `Save` is
    /// handed back for the host to run.
    pub fn handle_key(&mut self, chord: &KeyChord) -> Result<Option<ShortcutAction>, CoreError> {
        let action = shortcuts::resolve(self.tab, chord);
        match action {
            Some(ShortcutAction::Undo) => {
                self.undo()?;
            }
            Some(ShortcutAction::Redo) => {
                self.redo()?;
            }
            Some(ShortcutAction::Save) | None => {}
        }
        Ok(action)
    }

    /// Step back one history entry. Returns `false` at the oldest entry.
    pub fn undo(&mut self) -> Result<bool, CoreError> {
        let Some(entry) = self.history.undo().cloned() else {
            return Ok(false);
        };
        self.restore(entry)?;
        self.toast(ToastLevel::Info, "Undone");
        Ok(true)
    }

    /// Step forward one history entry. Returns `false` at the newest entry.
    pub fn redo(&mut self) -> Result<bool, CoreError> {
        let Some(entry) = self.history.redo().cloned() else {
            return Ok(false);
        };
        self.restore(entry)?;
        self.toast(ToastLevel::Info, "Redone");
        Ok(true)
    }

    /// Write a history entry back into the draft: blocks go to the active
    /// page only, the config is global.
    fn restore(&mut self, entry: Snapshot) -> Result<(), CoreError> {
        let Snapshot { blocks, config } = entry;
        if let Some(page_id) = self.active_page_id.clone() {
            self.draft.edit_page(&page_id, |page| {
                page.blocks = blocks;
                Ok(())
            })?;
        }
        self.draft.set_config(config);

        if let Some(selected) = &self.selected_block_id {
            let still_there = self
                .active_page()
                .is_some_and(|p| p.block_index(selected).is_some());
            if !still_there {
                self.selected_block_id = None;
            }
        }

        // Consumes the replay flag; the restored state is already the
        // current entry.
        let snapshot = self.snapshot();
        self.history.record(snapshot);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Saving and external state
    // -----------------------------------------------------------------------

    /// Start a save, or `None` when one is already in flight.
    pub fn begin_save(&mut self) -> Option<SavePlan> {
        self.draft.begin_save()
    }

    pub fn complete_save(&mut self, plan: &SavePlan) {
        self.draft.complete_save(plan);
        if !plan.is_empty() {
            self.toast(ToastLevel::Success, "All changes saved");
        }
    }

    pub fn fail_save(&mut self, error: &CoreError) {
        self.draft.fail_save();
        self.toast(ToastLevel::Error, format!("Save failed: {error}"));
    }

    /// Offer externally committed state. Dropped while there are unsaved
    /// changes or a save in flight; returns whether it was applied.
    pub fn resync(&mut self, pages: Vec<Page>, config: Option<StoreConfig>) -> bool {
        if !self.draft.resync(pages, config) {
            return false;
        }
        self.ensure_active_page();
        self.record();
        true
    }

    /// Reflect a page created directly against the backend.
    pub fn adopt_page(&mut self, page: Page) {
        self.draft.adopt_page(page);
        if self.active_page_id.is_none() {
            self.ensure_active_page();
        }
    }

    /// Reflect a page deleted directly against the backend.
    pub fn forget_page(&mut self, page_id: &str) -> bool {
        let removed = self.draft.forget_page(page_id);
        if removed {
            self.ensure_active_page();
        }
        removed
    }

    fn ensure_active_page(&mut self) {
        let still_there = self
            .active_page_id
            .as_deref()
            .is_some_and(|id| self.draft.page(id).is_some());
        if !still_there {
            self.active_page_id = initial_page(self.draft.pages());
            self.selected_block_id = None;
            self.history.reset(self.snapshot());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Block, BlockKind};
    use crate::history::MAX_HISTORY_ENTRIES;
    use crate::page::NewPage;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn named(name: &str) -> NewBlock {
        NewBlock {
            name: Some(name.into()),
            ..NewBlock::of_kind(BlockKind::Section)
        }
    }

    fn page_with(names: &[&str]) -> Page {
        let blocks = names
            .iter()
            .map(|n| {
                let mut b = Block::new(BlockKind::Section, *n);
                b.id = n.to_string();
                b
            })
            .collect();
        NewPage {
            title: Some("Home".into()),
            slug: Some("/".into()),
            page_type: Some(PageType::Home),
            blocks: Some(blocks),
            ..Default::default()
        }
        .into_page()
        .unwrap()
    }

    fn session(names: &[&str]) -> EditorSession {
        EditorSession::open("store-1", vec![page_with(names)], StoreConfig::default())
    }

    fn block_names(s: &EditorSession) -> Vec<String> {
        s.active_page()
            .unwrap()
            .blocks
            .iter()
            .map(|b| b.name.clone())
            .collect()
    }

    #[test]
    fn open_selects_home_page_and_seeds_history() {
        let about = NewPage {
            title: Some("About".into()),
            slug: Some("/about".into()),
            ..Default::default()
        }
        .into_page()
        .unwrap();
        let home = page_with(&["A"]);
        let home_id = home.id.clone();
        let s = EditorSession::open("s", vec![about, home], StoreConfig::default());

        assert_eq!(s.active_page_id(), Some(home_id.as_str()));
        assert_eq!(s.tab(), AdminTab::Design);
        assert_eq!(s.history().len(), 1);
        assert!(!s.is_dirty());
    }

    #[test]
    fn add_delete_undo_undo_redo() {
        let mut s = session(&["A"]);

        s.apply(StudioCommand::AddBlock {
            block: named("B"),
            after: Some("A".into()),
        })
        .unwrap();
        assert_eq!(block_names(&s), ["A", "B"]);
        assert_eq!(s.history().len(), 2);

        s.apply(StudioCommand::DeleteBlock {
            block_id: "A".into(),
        })
        .unwrap();
        assert_eq!(block_names(&s), ["B"]);
        assert_eq!(s.history().len(), 3);

        s.apply(StudioCommand::Undo).unwrap();
        assert_eq!(block_names(&s), ["A", "B"]);
        s.apply(StudioCommand::Undo).unwrap();
        assert_eq!(block_names(&s), ["A"]);
        s.apply(StudioCommand::Redo).unwrap();
        assert_eq!(block_names(&s), ["A", "B"]);
        assert_eq!(s.history().len(), 3);
    }

    #[test]
    fn undo_at_oldest_entry_is_noop_without_toast() {
        let mut s = session(&["A"]);
        let outcome = s.apply(StudioCommand::Undo).unwrap();
        assert!(!outcome.changed);
        assert!(s.drain_toasts().is_empty());
        assert!(!s.is_dirty());
    }

    #[test]
    fn undo_marks_dirty_and_toasts() {
        let mut s = session(&["A"]);
        s.apply(StudioCommand::ToggleHidden {
            block_id: "A".into(),
        })
        .unwrap();
        let plan = s.begin_save().unwrap();
        s.complete_save(&plan);
        s.drain_toasts();
        assert!(!s.is_dirty());

        s.apply(StudioCommand::Undo).unwrap();
        assert!(s.is_dirty());
        assert_eq!(
            s.drain_toasts(),
            [Toast {
                level: ToastLevel::Info,
                message: "Undone".into()
            }]
        );
    }

    #[test]
    fn edit_after_undo_truncates_redo() {
        let mut s = session(&["A"]);
        s.apply(StudioCommand::AddBlock {
            block: named("B"),
            after: None,
        })
        .unwrap();
        s.apply(StudioCommand::AddBlock {
            block: named("C"),
            after: None,
        })
        .unwrap();
        s.apply(StudioCommand::Undo).unwrap();
        s.apply(StudioCommand::Undo).unwrap();
        s.apply(StudioCommand::RenameBlock {
            block_id: "A".into(),
            name: "Intro".into(),
        })
        .unwrap();

        assert!(!s.can_redo());
        let outcome = s.apply(StudioCommand::Redo).unwrap();
        assert!(!outcome.changed);
        assert_eq!(block_names(&s), ["Intro"]);
    }

    #[test]
    fn history_bounded_after_sixty_edits() {
        let mut s = session(&["A"]);
        for i in 0..60 {
            s.apply(StudioCommand::RenameBlock {
                block_id: "A".into(),
                name: format!("Name {i}"),
            })
            .unwrap();
        }
        assert_eq!(s.history().len(), MAX_HISTORY_ENTRIES);
        assert_eq!(s.history().index(), MAX_HISTORY_ENTRIES - 1);
    }

    #[test]
    fn config_changes_are_undoable() {
        let mut s = session(&["A"]);
        let config = StoreConfig {
            primary_color: "#ff3366".into(),
            ..Default::default()
        };
        s.apply(StudioCommand::UpdateConfig { config }).unwrap();
        assert_eq!(s.config().primary_color, "#ff3366");

        s.apply(StudioCommand::Undo).unwrap();
        assert_eq!(s.config().primary_color, "#000000");
    }

    #[test]
    fn invalid_config_is_rejected_without_dirtying() {
        let mut s = session(&["A"]);
        let config = StoreConfig {
            primary_color: "blue".into(),
            ..Default::default()
        };
        assert_matches!(
            s.apply(StudioCommand::UpdateConfig { config }),
            Err(CoreError::Validation(_))
        );
        assert!(!s.is_dirty());
    }

    #[test]
    fn edits_off_design_tab_are_not_recorded() {
        let mut s = session(&["A"]);
        s.apply(StudioCommand::SetTab {
            tab: AdminTab::Settings,
        })
        .unwrap();
        s.apply(StudioCommand::UpdateConfig {
            config: StoreConfig {
                name: "Renamed".into(),
                ..Default::default()
            },
        })
        .unwrap();
        assert_eq!(s.history().len(), 1);
        assert!(s.is_dirty());
    }

    #[test]
    fn drag_reorder_matches_splice_semantics() {
        let mut s = session(&["A", "B", "C", "D"]);
        let outcome = s.apply(StudioCommand::ReorderBlock { from: 2, to: 0 }).unwrap();
        assert!(outcome.changed);
        assert_eq!(block_names(&s), ["C", "A", "B", "D"]);
    }

    #[test]
    fn move_at_boundary_does_not_dirty() {
        let mut s = session(&["A", "B"]);
        let outcome = s
            .apply(StudioCommand::MoveBlock {
                index: 0,
                direction: Direction::Up,
            })
            .unwrap();
        assert!(!outcome.changed);
        assert!(!s.is_dirty());
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn every_block_mutation_sets_dirty() {
        let commands = [
            StudioCommand::DuplicateBlock {
                block_id: "A".into(),
            },
            StudioCommand::ToggleHidden {
                block_id: "A".into(),
            },
            StudioCommand::ToggleLocked {
                block_id: "A".into(),
            },
            StudioCommand::RenameBlock {
                block_id: "A".into(),
                name: "Hero".into(),
            },
            StudioCommand::MoveBlock {
                index: 0,
                direction: Direction::Down,
            },
            StudioCommand::DeleteBlock {
                block_id: "B".into(),
            },
            StudioCommand::UpdateBlockData {
                block_id: "A".into(),
                data: json!({"heading": "Hi"}).as_object().unwrap().clone(),
            },
        ];
        for command in commands {
            let mut s = session(&["A", "B"]);
            s.apply(command.clone()).unwrap();
            assert!(s.is_dirty(), "{command:?} should mark the draft dirty");
        }
    }

    #[test]
    fn deleting_selected_block_clears_selection() {
        let mut s = session(&["A", "B"]);
        s.apply(StudioCommand::SelectBlock {
            block_id: Some("B".into()),
        })
        .unwrap();
        s.apply(StudioCommand::DeleteBlock {
            block_id: "B".into(),
        })
        .unwrap();
        assert!(s.selected_block_id().is_none());
    }

    #[test]
    fn add_and_duplicate_select_the_new_block() {
        let mut s = session(&["A"]);
        let added = s
            .apply(StudioCommand::AddBlock {
                block: NewBlock::of_kind(BlockKind::SystemHero),
                after: None,
            })
            .unwrap();
        assert_eq!(s.selected_block_id(), added.block_id.as_deref());

        let dup = s
            .apply(StudioCommand::DuplicateBlock {
                block_id: "A".into(),
            })
            .unwrap();
        assert_eq!(s.selected_block_id(), dup.block_id.as_deref());
        assert_eq!(block_names(&s), ["A", "A (Copy)", "Hero"]);
    }

    #[test]
    fn failed_mutation_changes_nothing() {
        let mut s = session(&["A"]);
        s.apply(StudioCommand::ToggleLocked {
            block_id: "A".into(),
        })
        .unwrap();
        let len = s.history().len();

        let result = s.apply(StudioCommand::DeleteBlock {
            block_id: "A".into(),
        });
        assert_matches!(result, Err(CoreError::Conflict(_)));
        assert_eq!(block_names(&s), ["A"]);
        assert_eq!(s.history().len(), len);
    }

    #[test]
    fn switching_page_resets_history() {
        let about = NewPage {
            title: Some("About".into()),
            slug: Some("/about".into()),
            ..Default::default()
        }
        .into_page()
        .unwrap();
        let about_id = about.id.clone();
        let mut s = EditorSession::open(
            "s",
            vec![page_with(&["A"]), about],
            StoreConfig::default(),
        );
        s.apply(StudioCommand::ToggleHidden {
            block_id: "A".into(),
        })
        .unwrap();
        assert!(s.can_undo());

        s.apply(StudioCommand::SetActivePage { page_id: about_id })
            .unwrap();
        assert!(!s.can_undo());
        assert_eq!(s.history().len(), 1);
        assert_eq!(block_names(&s), ["Intro Text"]);
    }

    #[test]
    fn resync_guarded_by_dirty_flag() {
        let mut s = session(&["A"]);
        s.apply(StudioCommand::AddBlock {
            block: named("B"),
            after: None,
        })
        .unwrap();

        assert!(!s.resync(vec![page_with(&["X"])], None));
        assert_eq!(block_names(&s), ["A", "B"]);
    }

    #[test]
    fn resync_applies_when_clean() {
        let mut s = session(&["A"]);
        let remote = page_with(&["X", "Y"]);
        assert!(s.resync(vec![remote], None));
        assert_eq!(block_names(&s), ["X", "Y"]);
        assert!(!s.is_dirty());
    }

    #[test]
    fn dirty_clears_only_after_successful_save() {
        let mut s = session(&["A"]);
        s.apply(StudioCommand::ToggleHidden {
            block_id: "A".into(),
        })
        .unwrap();

        let plan = s.begin_save().unwrap();
        assert!(s.is_dirty());
        s.fail_save(&CoreError::Storage("offline".into()));
        assert!(s.is_dirty());
        assert_eq!(s.drain_toasts()[0].level, ToastLevel::Error);

        let plan2 = s.begin_save().unwrap();
        assert_eq!(plan2.pages, plan.pages);
        s.complete_save(&plan2);
        assert!(!s.is_dirty());
        assert_eq!(s.drain_toasts()[0].level, ToastLevel::Success);
    }

    #[test]
    fn forgetting_active_page_picks_another() {
        let about = NewPage {
            title: Some("About".into()),
            slug: Some("/about".into()),
            ..Default::default()
        }
        .into_page()
        .unwrap();
        let about_id = about.id.clone();
        let home = page_with(&["A"]);
        let home_id = home.id.clone();
        let mut s = EditorSession::open("s", vec![home, about], StoreConfig::default());

        assert!(s.forget_page(&home_id));
        assert_eq!(s.active_page_id(), Some(about_id.as_str()));
    }

    #[test]
    fn shortcuts_drive_history() {
        let mut s = session(&["A"]);
        s.apply(StudioCommand::ToggleHidden {
            block_id: "A".into(),
        })
        .unwrap();

        let action = s.handle_key(&KeyChord::new("z").meta()).unwrap();
        assert_eq!(action, Some(ShortcutAction::Undo));
        assert!(!s.active_page().unwrap().blocks[0].hidden);

        let action = s.handle_key(&KeyChord::new("y").ctrl()).unwrap();
        assert_eq!(action, Some(ShortcutAction::Redo));
        assert!(s.active_page().unwrap().blocks[0].hidden);

        s.apply(StudioCommand::SetTab {
            tab: AdminTab::Products,
        })
        .unwrap();
        assert_eq!(s.handle_key(&KeyChord::new("z").ctrl()).unwrap(), None);
        assert!(s.active_page().unwrap().blocks[0].hidden);
    }

    #[test]
    fn commands_deserialize_from_tagged_json() {
        let command: StudioCommand = serde_json::from_value(json!({
            "command": "reorder_block",
            "from": 2,
            "to": 0
        }))
        .unwrap();
        assert_eq!(command, StudioCommand::ReorderBlock { from: 2, to: 0 });

        let command: StudioCommand =
            serde_json::from_value(json!({"command": "undo"})).unwrap();
        assert_eq!(command, StudioCommand::Undo);
    }
}
