//! In-memory page store.
//!
//! # Responsibility
//! - Own the single page aggregate edited by the studio.
//! - Provide the add/update/remove/toggle/reorder block actions and the
//!   shallow-merge profile/theme/SEO actions.
//!
//! # Invariants
//! - Generated block ids never collide with ids already in the sequence.
//! - Actions targeting an absent block id are no-ops.
//! - `reorder_blocks` replaces the sequence wholesale without validation.
//! - Every applied action bumps `revision` by one.

use crate::model::block::{BlockId, BlockPatch, BlockType, PageBlock};
use crate::model::profile::{ProfilePatch, SeoPatch, SeoSettings, UserProfile};
use crate::model::snapshot::Snapshot;
use crate::model::theme::{ThemePatch, ThemePreset, ThemeSettings};
use chrono::{DateTime, Utc};
use log::debug;
use uuid::Uuid;

/// Single-threaded owner of the page aggregate.
#[derive(Debug, Clone)]
pub struct PageStore {
    state: Snapshot,
    revision: u64,
}

impl PageStore {
    /// Creates a store holding `snapshot` at revision 0.
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            state: snapshot,
            revision: 0,
        }
    }

    /// Creates a store with the first-run seeded state.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self::new(Snapshot::seeded(now))
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn state(&self) -> &Snapshot {
        &self.state
    }

    pub fn profile(&self) -> &UserProfile {
        &self.state.profile
    }

    pub fn blocks(&self) -> &[PageBlock] {
        &self.state.blocks
    }

    pub fn theme(&self) -> &ThemeSettings {
        &self.state.theme
    }

    pub fn seo(&self) -> &SeoSettings {
        &self.state.seo
    }

    pub fn block(&self, id: &str) -> Option<&PageBlock> {
        self.state.find_block(id)
    }

    /// Blocks with `visible == true`, in render order.
    pub fn visible_blocks(&self) -> impl Iterator<Item = &PageBlock> {
        self.state.blocks.iter().filter(|block| block.visible)
    }

    /// Clones the whole aggregate for persistence or sharing.
    pub fn snapshot(&self) -> Snapshot {
        self.state.clone()
    }

    /// Replaces the whole aggregate (import/restore).
    pub fn replace_snapshot(&mut self, snapshot: Snapshot) {
        self.state = snapshot;
        self.bump("replace_snapshot");
    }

    pub fn set_profile(&mut self, patch: &ProfilePatch) {
        patch.apply_to(&mut self.state.profile);
        self.bump("set_profile");
    }

    pub fn set_seo(&mut self, patch: &SeoPatch) {
        patch.apply_to(&mut self.state.seo);
        self.bump("set_seo");
    }

    pub fn set_theme(&mut self, patch: &ThemePatch) {
        patch.apply_to(&mut self.state.theme);
        self.bump("set_theme");
    }

    pub fn apply_preset(&mut self, preset: ThemePreset) {
        self.state.theme.apply_preset(preset);
        self.bump("apply_preset");
    }

    /// Appends a block of `kind` with kind defaults and returns its id.
    pub fn add_block(&mut self, kind: BlockType) -> BlockId {
        self.add_block_at(kind, Utc::now())
    }

    /// Same as `add_block`, with an explicit clock for countdown defaults.
    pub fn add_block_at(&mut self, kind: BlockType, now: DateTime<Utc>) -> BlockId {
        let id = self.fresh_block_id();
        self.state
            .blocks
            .push(PageBlock::with_id(id.clone(), kind, now));
        self.bump("add_block");
        id
    }

    /// Merges `patch` into the block with `id`.
    ///
    /// Returns `false` (and changes nothing) when no block matches.
    pub fn update_block(&mut self, id: &str, patch: &BlockPatch) -> bool {
        let Some(block) = self.block_mut(id) else {
            return false;
        };
        patch.apply_to(block);
        self.bump("update_block");
        true
    }

    /// Removes the block with `id`; returns whether one was removed.
    pub fn remove_block(&mut self, id: &str) -> bool {
        let before = self.state.blocks.len();
        self.state.blocks.retain(|block| block.id != id);
        if self.state.blocks.len() == before {
            return false;
        }
        self.bump("remove_block");
        true
    }

    /// Flips `visible` on the block with `id`.
    ///
    /// Returns the new visibility, or `None` when no block matches.
    pub fn toggle_block_visibility(&mut self, id: &str) -> Option<bool> {
        let block = self.block_mut(id)?;
        block.visible = !block.visible;
        let visible = block.visible;
        self.bump("toggle_block_visibility");
        Some(visible)
    }

    /// Replaces the block sequence with `blocks`.
    pub fn reorder_blocks(&mut self, blocks: Vec<PageBlock>) {
        self.state.blocks = blocks;
        self.bump("reorder_blocks");
    }

    /// Moves the block with `id` to `to_index` (clamped to the last slot).
    ///
    /// Built on `reorder_blocks`; returns `false` when no block matches.
    pub fn move_block(&mut self, id: &str, to_index: usize) -> bool {
        let Some(from) = self.state.blocks.iter().position(|block| block.id == id) else {
            return false;
        };
        let mut blocks = self.state.blocks.clone();
        let moved = blocks.remove(from);
        let to = to_index.min(blocks.len());
        blocks.insert(to, moved);
        self.reorder_blocks(blocks);
        true
    }

    fn block_mut(&mut self, id: &str) -> Option<&mut PageBlock> {
        self.state.blocks.iter_mut().find(|block| block.id == id)
    }

    fn fresh_block_id(&self) -> BlockId {
        loop {
            let candidate = Uuid::new_v4().to_string();
            if self.state.find_block(&candidate).is_none() {
                return candidate;
            }
        }
    }

    fn bump(&mut self, action: &str) {
        self.revision += 1;
        debug!(
            "event=store_action module=store status=ok action={} revision={} blocks={}",
            action,
            self.revision,
            self.state.blocks.len()
        );
    }
}
