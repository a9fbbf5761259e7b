//! Mutations over a page's ordered block list.
//!
//! Order is render order. All functions operate in place; the draft layer
//! runs them on a working copy so a failed mutation leaves nothing behind.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::block::{validate_block_name, Block};
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

fn find(blocks: &[Block], id: &str) -> Result<usize, CoreError> {
    blocks
        .iter()
        .position(|b| b.id == id)
        .ok_or_else(|| CoreError::not_found("Block", id))
}

fn find_mut<'a>(blocks: &'a mut [Block], id: &str) -> Result<&'a mut Block, CoreError> {
    blocks
        .iter_mut()
        .find(|b| b.id == id)
        .ok_or_else(|| CoreError::not_found("Block", id))
}

/// Insert `block` right after `after`, or at the end when `after` is `None`
/// or not on the page. Returns the index it landed at.
pub fn insert(blocks: &mut Vec<Block>, block: Block, after: Option<&str>) -> usize {
    let index = after
        .and_then(|id| blocks.iter().position(|b| b.id == id))
        .map_or(blocks.len(), |i| i + 1);
    blocks.insert(index, block);
    index
}

/// Remove a block. Locked blocks cannot be removed.
pub fn remove(blocks: &mut Vec<Block>, id: &str) -> Result<Block, CoreError> {
    let index = find(blocks, id)?;
    blocks[index].ensure_unlocked()?;
    Ok(blocks.remove(index))
}

/// Swap the block at `index` with its neighbour. Returns `false` (and does
/// nothing) at the list boundaries.
pub fn move_by_one(blocks: &mut [Block], index: usize, direction: Direction) -> bool {
    let target = match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => index.checked_add(1),
    };
    match target {
        Some(target) if index < blocks.len() && target < blocks.len() => {
            blocks.swap(index, target);
            true
        }
        _ => false,
    }
}

/// Drag-and-drop: take the block out of `from` and reinsert it at `to`.
///
/// Out-of-range indices and `from == to` leave the list unchanged and
/// return `false`.
pub fn reorder(blocks: &mut Vec<Block>, from: usize, to: usize) -> bool {
    if from == to || from >= blocks.len() || to >= blocks.len() {
        return false;
    }
    let block = blocks.remove(from);
    blocks.insert(to, block);
    true
}

/// Insert a copy directly after the original. Returns the copy's id.
pub fn duplicate(blocks: &mut Vec<Block>, id: &str) -> Result<String, CoreError> {
    let index = find(blocks, id)?;
    let copy = blocks[index].duplicate();
    let copy_id = copy.id.clone();
    blocks.insert(index + 1, copy);
    Ok(copy_id)
}

/// Flip visibility. Returns the new `hidden` value.
pub fn toggle_hidden(blocks: &mut [Block], id: &str) -> Result<bool, CoreError> {
    let block = find_mut(blocks, id)?;
    block.hidden = !block.hidden;
    Ok(block.hidden)
}

/// Flip the lock. Returns the new `locked` value.
pub fn toggle_locked(blocks: &mut [Block], id: &str) -> Result<bool, CoreError> {
    let block = find_mut(blocks, id)?;
    block.locked = !block.locked;
    Ok(block.locked)
}

pub fn rename(blocks: &mut [Block], id: &str, name: &str) -> Result<(), CoreError> {
    validate_block_name(name)?;
    let block = find_mut(blocks, id)?;
    block.name = name.trim().to_string();
    Ok(())
}

/// Shallow-merge `patch` into the block's data.
pub fn update_data(
    blocks: &mut [Block],
    id: &str,
    patch: &Map<String, Value>,
) -> Result<(), CoreError> {
    let block = find_mut(blocks, id)?;
    block.ensure_unlocked()?;
    block.data = block.data.merged(patch)?;
    Ok(())
}

pub fn update_content(blocks: &mut [Block], id: &str, content: &str) -> Result<(), CoreError> {
    let block = find_mut(blocks, id)?;
    block.ensure_unlocked()?;
    block.content = content.to_string();
    Ok(())
}

/// Switch the visual variant; `None` falls back to the store-wide style.
pub fn set_variant(
    blocks: &mut [Block],
    id: &str,
    variant: Option<&str>,
) -> Result<(), CoreError> {
    let block = find_mut(blocks, id)?;
    block.ensure_unlocked()?;
    block.variant = variant.map(str::to_string);
    Ok(())
}
