//! Document model: block records and the in-memory store that owns them.
//!
//! The store is the parent data structure for [`BlockPosition`] values.
//! Overlays are rebuilt from it; drag sessions read from it at pointer-down
//! and write back to it once, at pointer-up.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::block::BlockPosition;

/// Stable identifier for a block.
pub type BlockId = String;

/// Fresh random block id.
#[must_use]
pub fn new_block_id() -> BlockId {
    Uuid::new_v4().to_string()
}

fn default_visible() -> bool {
    true
}

/// A block as stored by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub position: BlockPosition,
    /// Stacking order; lower values are drawn beneath higher values.
    #[serde(default)]
    pub z_index: i64,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Recognized or translated text shown next to the block, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Block {
    /// New visible block with a random id and z-index 0.
    #[must_use]
    pub fn new(position: BlockPosition) -> Self {
        Self::with_id(new_block_id(), position)
    }

    #[must_use]
    pub fn with_id(id: impl Into<BlockId>, position: BlockPosition) -> Self {
        Self { id: id.into(), position, z_index: 0, visible: true, label: None }
    }
}

#[derive(Debug, Clone)]
struct StoredBlock {
    seq: u64,
    block: Block,
}

/// In-memory store of blocks keyed by id.
#[derive(Debug, Clone, Default)]
pub struct BlockStore {
    blocks: HashMap<BlockId, StoredBlock>,
    next_seq: u64,
}

impl BlockStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a block. A replaced block keeps its original
    /// insertion position for tie-breaking.
    pub fn insert(&mut self, block: Block) -> Option<Block> {
        if let Some(stored) = self.blocks.get_mut(&block.id) {
            return Some(std::mem::replace(&mut stored.block, block));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.blocks.insert(block.id.clone(), StoredBlock { seq, block });
        None
    }

    pub fn remove(&mut self, id: &str) -> Option<Block> {
        self.blocks.remove(id).map(|s| s.block)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Block> {
        self.blocks.get(id).map(|s| &s.block)
    }

    /// Overwrite a block's geometry. Returns false if the block doesn't exist.
    pub fn set_position(&mut self, id: &str, position: BlockPosition) -> bool {
        let Some(stored) = self.blocks.get_mut(id) else {
            return false;
        };
        stored.block.position = position;
        true
    }

    /// Replace all blocks with a full snapshot.
    pub fn load_snapshot(&mut self, blocks: Vec<Block>) {
        self.blocks.clear();
        self.next_seq = 0;
        for block in blocks {
            self.insert(block);
        }
    }

    /// All blocks sorted by `(z_index, insertion order)`, bottom first.
    #[must_use]
    pub fn sorted_blocks(&self) -> Vec<&Block> {
        let mut stored: Vec<&StoredBlock> = self.blocks.values().collect();
        stored.sort_by(|a, b| a.block.z_index.cmp(&b.block.z_index).then_with(|| a.seq.cmp(&b.seq)));
        stored.into_iter().map(|s| &s.block).collect()
    }

    /// z-index that places a new block above every existing one.
    #[must_use]
    pub fn next_z_index(&self) -> i64 {
        self.blocks.values().map(|s| s.block.z_index).max().map_or(0, |z| z.saturating_add(1))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
