//! Auto-persisting editor session.
//!
//! # Responsibility
//! - Load the persisted snapshot (or seed one) when the studio opens.
//! - Run store actions and persist the whole aggregate after each change.
//!
//! # Invariants
//! - Malformed persisted state never blocks opening; seeded defaults are
//!   used and a warning is logged.
//! - Storage transport failures propagate to the caller.
//! - No-op actions (unknown block id) do not write.

use crate::model::block::{BlockId, BlockPatch, BlockType, PageBlock};
use crate::model::profile::{ProfilePatch, SeoPatch};
use crate::model::snapshot::Snapshot;
use crate::model::theme::{ThemePatch, ThemePreset};
use crate::repo::snapshot_repo::{SnapshotRepository, STORAGE_KEY};
use crate::repo::RepoResult;
use crate::share::decode_share_token;
use crate::store::PageStore;
use chrono::{DateTime, Utc};
use log::{info, warn};

/// How the session state was obtained on open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrigin {
    /// Restored from storage.
    Restored,
    /// Nothing stored; seeded defaults.
    Seeded,
    /// Stored state was unreadable; seeded defaults.
    Recovered,
}

/// Editor session over a `PageStore` with write-through persistence.
pub struct EditorSession<R: SnapshotRepository> {
    repo: R,
    store: PageStore,
    origin: SessionOrigin,
}

impl<R: SnapshotRepository> EditorSession<R> {
    /// Opens the session, restoring persisted state when possible.
    ///
    /// # Errors
    /// Returns storage transport errors; malformed content is recovered.
    pub fn open(repo: R, now: DateTime<Utc>) -> RepoResult<Self> {
        let (snapshot, origin) = match repo.load_snapshot(STORAGE_KEY) {
            Ok(Some(snapshot)) => (snapshot, SessionOrigin::Restored),
            Ok(None) => (Snapshot::seeded(now), SessionOrigin::Seeded),
            Err(err) if err.is_malformed_data() => {
                warn!(
                    "event=session_open module=service status=recovered error={}",
                    err
                );
                (Snapshot::seeded(now), SessionOrigin::Recovered)
            }
            Err(err) => return Err(err),
        };

        info!(
            "event=session_open module=service status=ok origin={:?} blocks={}",
            origin,
            snapshot.blocks.len()
        );
        Ok(Self {
            repo,
            store: PageStore::new(snapshot),
            origin,
        })
    }

    pub fn origin(&self) -> SessionOrigin {
        self.origin
    }

    pub fn store(&self) -> &PageStore {
        &self.store
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.store.state()
    }

    /// Writes the current aggregate to storage.
    pub fn persist(&self) -> RepoResult<()> {
        self.repo.save_snapshot(STORAGE_KEY, self.store.state())
    }

    pub fn add_block(&mut self, kind: BlockType) -> RepoResult<BlockId> {
        let id = self.store.add_block(kind);
        self.persist()?;
        Ok(id)
    }

    pub fn update_block(&mut self, id: &str, patch: &BlockPatch) -> RepoResult<bool> {
        self.persist_if(|store| store.update_block(id, patch))
    }

    pub fn remove_block(&mut self, id: &str) -> RepoResult<bool> {
        self.persist_if(|store| store.remove_block(id))
    }

    pub fn toggle_block_visibility(&mut self, id: &str) -> RepoResult<Option<bool>> {
        let visible = self.store.toggle_block_visibility(id);
        if visible.is_some() {
            self.persist()?;
        }
        Ok(visible)
    }

    pub fn move_block(&mut self, id: &str, to_index: usize) -> RepoResult<bool> {
        self.persist_if(|store| store.move_block(id, to_index))
    }

    pub fn reorder_blocks(&mut self, blocks: Vec<PageBlock>) -> RepoResult<()> {
        self.store.reorder_blocks(blocks);
        self.persist()
    }

    pub fn set_profile(&mut self, patch: &ProfilePatch) -> RepoResult<()> {
        self.store.set_profile(patch);
        self.persist()
    }

    pub fn set_theme(&mut self, patch: &ThemePatch) -> RepoResult<()> {
        self.store.set_theme(patch);
        self.persist()
    }

    pub fn apply_preset(&mut self, preset: ThemePreset) -> RepoResult<()> {
        self.store.apply_preset(preset);
        self.persist()
    }

    pub fn set_seo(&mut self, patch: &SeoPatch) -> RepoResult<()> {
        self.store.set_seo(patch);
        self.persist()
    }

    /// Replaces the whole aggregate and persists it.
    pub fn replace_snapshot(&mut self, snapshot: Snapshot) -> RepoResult<()> {
        self.store.replace_snapshot(snapshot);
        self.persist()
    }

    /// Imports state from a share token.
    ///
    /// Returns `false` and keeps the current state when the token is
    /// malformed.
    pub fn import_token(&mut self, token: &str) -> RepoResult<bool> {
        let Some(snapshot) = decode_share_token(token) else {
            warn!("event=import_token module=service status=ignored");
            return Ok(false);
        };
        self.replace_snapshot(snapshot)?;
        info!("event=import_token module=service status=ok");
        Ok(true)
    }

    /// Drops stored state and returns to seeded defaults.
    pub fn reset(&mut self, now: DateTime<Utc>) -> RepoResult<()> {
        let cleared = self.repo.clear_snapshot(STORAGE_KEY)?;
        self.store.replace_snapshot(Snapshot::seeded(now));
        self.origin = SessionOrigin::Seeded;
        info!(
            "event=session_reset module=service status=ok cleared={}",
            cleared
        );
        Ok(())
    }

    fn persist_if(&mut self, action: impl FnOnce(&mut PageStore) -> bool) -> RepoResult<bool> {
        let changed = action(&mut self.store);
        if changed {
            self.persist()?;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::{EditorSession, SessionOrigin};
    use crate::model::block::BlockType;
    use crate::model::snapshot::Snapshot;
    use crate::repo::snapshot_repo::SnapshotRepository;
    use crate::repo::{RepoError, RepoResult};
    use chrono::Utc;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct MemoryRepo {
        stored: RefCell<Option<Snapshot>>,
        corrupt: bool,
        saves: Cell<usize>,
    }

    impl SnapshotRepository for MemoryRepo {
        fn load_snapshot(&self, _key: &str) -> RepoResult<Option<Snapshot>> {
            if self.corrupt {
                return Err(RepoError::InvalidData("not json".to_string()));
            }
            Ok(self.stored.borrow().clone())
        }

        fn save_snapshot(&self, _key: &str, snapshot: &Snapshot) -> RepoResult<()> {
            self.saves.set(self.saves.get() + 1);
            *self.stored.borrow_mut() = Some(snapshot.clone());
            Ok(())
        }

        fn clear_snapshot(&self, _key: &str) -> RepoResult<bool> {
            Ok(self.stored.borrow_mut().take().is_some())
        }
    }

    #[test]
    fn empty_storage_opens_seeded() {
        let session = EditorSession::open(MemoryRepo::default(), Utc::now()).expect("open");
        assert_eq!(session.origin(), SessionOrigin::Seeded);
        assert_eq!(session.snapshot().blocks.len(), 4);
    }

    #[test]
    fn corrupt_storage_recovers_with_seed() {
        let repo = MemoryRepo {
            corrupt: true,
            ..MemoryRepo::default()
        };
        let session = EditorSession::open(repo, Utc::now()).expect("open");
        assert_eq!(session.origin(), SessionOrigin::Recovered);
        assert_eq!(session.snapshot().profile.display_name, "TapBio Creator");
    }

    #[test]
    fn mutations_write_through_and_no_ops_do_not() {
        let mut session = EditorSession::open(MemoryRepo::default(), Utc::now()).expect("open");
        let id = session.add_block(BlockType::Poll).expect("add");
        assert_eq!(session.repo.saves.get(), 1);

        assert!(!session.remove_block("missing").expect("remove"));
        assert_eq!(session.toggle_block_visibility("missing").expect("toggle"), None);
        assert_eq!(session.repo.saves.get(), 1);

        assert!(session.remove_block(&id).expect("remove"));
        assert_eq!(session.repo.saves.get(), 2);
        assert_eq!(
            session.repo.stored.borrow().as_ref().map(|s| s.blocks.len()),
            Some(4)
        );
    }

    #[test]
    fn garbage_token_keeps_state() {
        let mut session = EditorSession::open(MemoryRepo::default(), Utc::now()).expect("open");
        assert!(!session.import_token("not-a-token").expect("import"));
        assert_eq!(session.repo.saves.get(), 0);
    }
}
