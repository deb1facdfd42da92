//! Whole-aggregate snapshot.
//!
//! # Responsibility
//! - Bundle profile, ordered blocks, theme and SEO into one serializable unit.
//! - Provide the seeded first-run state.
//! - Report block id problems so load/import paths can log them.
//!
//! # Invariants
//! - A snapshot is always persisted/restored as a whole.
//! - Block order in `blocks` is render order.

use crate::model::block::{
    Animation, BlockContent, CountdownBlock, ImageBlock, LinkBlock, PageBlock, PlatformTarget,
    TipBlock, TipService,
};
use crate::model::profile::{SeoSettings, UserProfile};
use crate::model::theme::ThemeSettings;
use crate::model::time::format_timestamp;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Block id problems found in imported or persisted snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotValidationError {
    /// A block carries an empty/blank id.
    EmptyBlockId,
    /// Two blocks share the same id.
    DuplicateBlockId(String),
}

impl Display for SnapshotValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBlockId => write!(f, "block id must not be blank"),
            Self::DuplicateBlockId(id) => write!(f, "duplicate block id: {id}"),
        }
    }
}

impl Error for SnapshotValidationError {}

/// Full page state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub profile: UserProfile,
    pub blocks: Vec<PageBlock>,
    pub theme: ThemeSettings,
    pub seo: SeoSettings,
}

impl Snapshot {
    /// First-run state: default profile, four sample blocks, classic theme.
    ///
    /// The sample countdown targets `now + 3 days`.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self {
            profile: UserProfile::default(),
            blocks: seeded_blocks(now),
            theme: ThemeSettings::default(),
            seo: SeoSettings::default(),
        }
    }

    /// Checks that every block id is non-blank and unique.
    pub fn validate(&self) -> Result<(), SnapshotValidationError> {
        let mut seen = HashSet::with_capacity(self.blocks.len());
        for block in &self.blocks {
            if block.id.trim().is_empty() {
                return Err(SnapshotValidationError::EmptyBlockId);
            }
            if !seen.insert(block.id.as_str()) {
                return Err(SnapshotValidationError::DuplicateBlockId(block.id.clone()));
            }
        }
        Ok(())
    }

    pub fn find_block(&self, id: &str) -> Option<&PageBlock> {
        self.blocks.iter().find(|block| block.id == id)
    }
}

fn seeded_blocks(now: DateTime<Utc>) -> Vec<PageBlock> {
    let block = |id: &str, content: BlockContent| PageBlock {
        id: id.to_string(),
        visible: true,
        animation: Animation::None,
        schedule_start: None,
        schedule_end: None,
        platform_target: None,
        content,
    };

    let mut portfolio = block(
        "1",
        BlockContent::Link(LinkBlock {
            title: "My Portfolio".to_string(),
            url: "https://example.com".to_string(),
            icon: "Globe".to_string(),
        }),
    );
    portfolio.platform_target = Some(PlatformTarget::All);

    let next_drop = block(
        "2",
        BlockContent::Countdown(CountdownBlock {
            title: "Next Drop".to_string(),
            target_date: format_timestamp(now + Duration::days(3)),
        }),
    );

    let cover = block(
        "3",
        BlockContent::Image(ImageBlock {
            url: "https://images.unsplash.com/photo-1550684848-fac1c5b4e853?w=800&q=80"
                .to_string(),
            alt: None,
            caption: None,
        }),
    );

    let mut tip = block(
        "4",
        BlockContent::Tip(TipBlock {
            service: TipService::Kofi,
            username: "andokore".to_string(),
        }),
    );
    tip.animation = Animation::Pulse;

    vec![portfolio, next_drop, cover, tip]
}

#[cfg(test)]
mod tests {
    use super::{Snapshot, SnapshotValidationError};
    use crate::model::block::{Animation, BlockType};
    use chrono::Utc;

    #[test]
    fn seeded_snapshot_has_four_visible_blocks() {
        let snapshot = Snapshot::seeded(Utc::now());
        let kinds: Vec<BlockType> = snapshot.blocks.iter().map(|block| block.kind()).collect();

        assert_eq!(
            kinds,
            vec![
                BlockType::Link,
                BlockType::Countdown,
                BlockType::Image,
                BlockType::Tip
            ]
        );
        assert!(snapshot.blocks.iter().all(|block| block.visible));
        assert_eq!(snapshot.blocks[3].animation, Animation::Pulse);
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn validate_rejects_duplicate_and_blank_ids() {
        let mut snapshot = Snapshot::seeded(Utc::now());
        snapshot.blocks[1].id = "1".to_string();
        assert_eq!(
            snapshot.validate(),
            Err(SnapshotValidationError::DuplicateBlockId("1".to_string()))
        );

        snapshot.blocks[1].id = " ".to_string();
        assert_eq!(
            snapshot.validate(),
            Err(SnapshotValidationError::EmptyBlockId)
        );
    }
}
