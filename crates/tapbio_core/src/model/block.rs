//! Page block model.
//!
//! # Responsibility
//! - Define the tagged block union rendered on a bio page.
//! - Provide kind defaults used by "add block" and the partial-update merge.
//! - Evaluate the per-block schedule window and platform filter.
//!
//! # Invariants
//! - `id` is opaque and never rewritten after creation.
//! - The `type` tag of a block never changes through `BlockPatch`.
//! - `visible` defaults to `true` and `animation` to `none` when absent.

use crate::model::time::{format_timestamp, parse_timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque block identifier.
///
/// Seeded blocks use short numeric ids (`"1"`, `"2"`), generated blocks use
/// UUID v4 text, so the id is kept as a plain string.
pub type BlockId = String;

/// Block kind tag, serialized as the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Link,
    Countdown,
    Poll,
    Tip,
    Image,
    Gallery,
    Copy,
    Vcard,
}

impl BlockType {
    pub const ALL: [BlockType; 8] = [
        BlockType::Link,
        BlockType::Countdown,
        BlockType::Poll,
        BlockType::Tip,
        BlockType::Image,
        BlockType::Gallery,
        BlockType::Copy,
        BlockType::Vcard,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Countdown => "countdown",
            Self::Poll => "poll",
            Self::Tip => "tip",
            Self::Image => "image",
            Self::Gallery => "gallery",
            Self::Copy => "copy",
            Self::Vcard => "vcard",
        }
    }

    /// Parses a kind name, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
    }
}

impl Display for BlockType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emphasis animation applied to a rendered block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Animation {
    #[default]
    None,
    Pulse,
    Shake,
    Glow,
}

/// Platform filter for a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformTarget {
    #[default]
    All,
    Ios,
    Android,
}

/// Payment service behind a tip block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipService {
    Paypal,
    Stripe,
    #[default]
    Kofi,
}

impl TipService {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paypal => "paypal",
            Self::Stripe => "stripe",
            Self::Kofi => "kofi",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkBlock {
    pub title: String,
    pub url: String,
    /// Icon name from the icon set; unknown names fall back to `Link`.
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownBlock {
    pub title: String,
    pub target_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollBlock {
    pub question: String,
    pub option_a: String,
    pub option_b: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TipBlock {
    pub service: TipService,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBlock {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryBlock {
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyBlock {
    pub label: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VCardBlock {
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub button_label: String,
}

impl VCardBlock {
    /// Builds the vCard 3.0 payload offered as a download.
    pub fn to_vcard(&self) -> String {
        format!(
            "BEGIN:VCARD\nVERSION:3.0\nFN:{}\nTEL:{}\nEMAIL:{}\nEND:VCARD",
            self.full_name,
            self.phone.as_deref().unwrap_or_default(),
            self.email.as_deref().unwrap_or_default(),
        )
    }

    pub fn file_name(&self) -> String {
        format!("{}.vcf", self.full_name)
    }
}

/// Kind-specific payload, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockContent {
    Link(LinkBlock),
    Countdown(CountdownBlock),
    Poll(PollBlock),
    Tip(TipBlock),
    Image(ImageBlock),
    Gallery(GalleryBlock),
    Copy(CopyBlock),
    Vcard(VCardBlock),
}

impl BlockContent {
    pub fn kind(&self) -> BlockType {
        match self {
            Self::Link(_) => BlockType::Link,
            Self::Countdown(_) => BlockType::Countdown,
            Self::Poll(_) => BlockType::Poll,
            Self::Tip(_) => BlockType::Tip,
            Self::Image(_) => BlockType::Image,
            Self::Gallery(_) => BlockType::Gallery,
            Self::Copy(_) => BlockType::Copy,
            Self::Vcard(_) => BlockType::Vcard,
        }
    }

    /// Default payload for a freshly added block of `kind`.
    pub fn defaults_for(kind: BlockType, now: DateTime<Utc>) -> Self {
        match kind {
            BlockType::Link => Self::Link(LinkBlock {
                title: "New Link".to_string(),
                url: String::new(),
                icon: "Link".to_string(),
            }),
            BlockType::Countdown => Self::Countdown(CountdownBlock {
                title: "Coming Soon".to_string(),
                target_date: format_timestamp(now),
            }),
            BlockType::Poll => Self::Poll(PollBlock {
                question: "What should I create next?".to_string(),
                option_a: "Video".to_string(),
                option_b: "Blog Post".to_string(),
            }),
            BlockType::Tip => Self::Tip(TipBlock {
                service: TipService::Kofi,
                username: String::new(),
            }),
            BlockType::Image => Self::Image(ImageBlock {
                url: "https://placehold.co/600x400".to_string(),
                alt: None,
                caption: Some(String::new()),
            }),
            BlockType::Gallery => Self::Gallery(GalleryBlock {
                images: vec![
                    "https://placehold.co/400".to_string(),
                    "https://placehold.co/400".to_string(),
                ],
            }),
            BlockType::Copy => Self::Copy(CopyBlock {
                label: "Promo Code".to_string(),
                content: "SAVE20".to_string(),
                success_message: Some("Copied!".to_string()),
            }),
            BlockType::Vcard => Self::Vcard(VCardBlock {
                full_name: "John Doe".to_string(),
                phone: Some(String::new()),
                email: Some(String::new()),
                button_label: "Save Contact".to_string(),
            }),
        }
    }
}

/// One content unit on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBlock {
    pub id: BlockId,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub animation: Animation,
    /// Start of the display window, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_start: Option<String>,
    /// End of the display window, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_target: Option<PlatformTarget>,
    #[serde(flatten)]
    pub content: BlockContent,
}

fn default_visible() -> bool {
    true
}

impl PageBlock {
    /// Creates a block of `kind` with a generated id and kind defaults.
    pub fn new(kind: BlockType, now: DateTime<Utc>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), kind, now)
    }

    /// Creates a block of `kind` with a caller-provided id.
    ///
    /// Link blocks start with `platformTarget = all`; every other kind leaves
    /// the filter unset.
    pub fn with_id(id: impl Into<BlockId>, kind: BlockType, now: DateTime<Utc>) -> Self {
        let platform_target = match kind {
            BlockType::Link => Some(PlatformTarget::All),
            _ => None,
        };
        Self {
            id: id.into(),
            visible: true,
            animation: Animation::None,
            schedule_start: None,
            schedule_end: None,
            platform_target,
            content: BlockContent::defaults_for(kind, now),
        }
    }

    pub fn kind(&self) -> BlockType {
        self.content.kind()
    }

    /// Whether `now` falls inside the schedule window.
    ///
    /// Missing or unparseable bounds are treated as open.
    pub fn is_scheduled_at(&self, now: DateTime<Utc>) -> bool {
        let after_start = self
            .schedule_start
            .as_deref()
            .and_then(parse_timestamp)
            .map_or(true, |start| now >= start);
        let before_end = self
            .schedule_end
            .as_deref()
            .and_then(parse_timestamp)
            .map_or(true, |end| now <= end);
        after_start && before_end
    }

    /// Whether the block targets a viewer on `platform`.
    ///
    /// `None` means the viewer platform is unknown; only untargeted blocks
    /// (`all` or unset) match it.
    pub fn targets_platform(&self, platform: Option<PlatformTarget>) -> bool {
        match self.platform_target.unwrap_or_default() {
            PlatformTarget::All => true,
            target => platform == Some(target),
        }
    }
}

/// Partial block update.
///
/// Carries the union of all block fields. Fields that do not belong to the
/// target block's kind are ignored, so one patch shape serves every kind.
/// `id` and `type` are not part of the patch and can never be rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockPatch {
    pub visible: Option<bool>,
    pub animation: Option<Animation>,
    /// Empty string clears the bound.
    pub schedule_start: Option<String>,
    /// Empty string clears the bound.
    pub schedule_end: Option<String>,
    pub platform_target: Option<PlatformTarget>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub target_date: Option<String>,
    pub question: Option<String>,
    pub option_a: Option<String>,
    pub option_b: Option<String>,
    pub service: Option<TipService>,
    pub username: Option<String>,
    pub alt: Option<String>,
    pub caption: Option<String>,
    pub images: Option<Vec<String>>,
    pub label: Option<String>,
    pub content: Option<String>,
    pub success_message: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub button_label: Option<String>,
}

impl BlockPatch {
    /// Merges supplied fields into `block`.
    pub fn apply_to(&self, block: &mut PageBlock) {
        if let Some(visible) = self.visible {
            block.visible = visible;
        }
        if let Some(animation) = self.animation {
            block.animation = animation;
        }
        if let Some(start) = &self.schedule_start {
            block.schedule_start = non_blank(start);
        }
        if let Some(end) = &self.schedule_end {
            block.schedule_end = non_blank(end);
        }
        if let Some(target) = self.platform_target {
            block.platform_target = Some(target);
        }

        match &mut block.content {
            BlockContent::Link(link) => {
                merge(&mut link.title, &self.title);
                merge(&mut link.url, &self.url);
                merge(&mut link.icon, &self.icon);
            }
            BlockContent::Countdown(countdown) => {
                merge(&mut countdown.title, &self.title);
                merge(&mut countdown.target_date, &self.target_date);
            }
            BlockContent::Poll(poll) => {
                merge(&mut poll.question, &self.question);
                merge(&mut poll.option_a, &self.option_a);
                merge(&mut poll.option_b, &self.option_b);
            }
            BlockContent::Tip(tip) => {
                if let Some(service) = self.service {
                    tip.service = service;
                }
                merge(&mut tip.username, &self.username);
            }
            BlockContent::Image(image) => {
                merge(&mut image.url, &self.url);
                merge_optional(&mut image.alt, &self.alt);
                merge_optional(&mut image.caption, &self.caption);
            }
            BlockContent::Gallery(gallery) => {
                if let Some(images) = &self.images {
                    gallery.images = images.clone();
                }
            }
            BlockContent::Copy(copy) => {
                merge(&mut copy.label, &self.label);
                merge(&mut copy.content, &self.content);
                merge_optional(&mut copy.success_message, &self.success_message);
            }
            BlockContent::Vcard(card) => {
                merge(&mut card.full_name, &self.full_name);
                merge_optional(&mut card.phone, &self.phone);
                merge_optional(&mut card.email, &self.email);
                merge(&mut card.button_label, &self.button_label);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn merge(slot: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        slot.clone_from(value);
    }
}

fn merge_optional(slot: &mut Option<String>, value: &Option<String>) {
    if let Some(value) = value {
        *slot = Some(value.clone());
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Animation, BlockContent, BlockPatch, BlockType, PageBlock, PlatformTarget, VCardBlock,
    };
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn parse_accepts_every_kind_name() {
        for kind in BlockType::ALL {
            assert_eq!(BlockType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(BlockType::parse(" VCard "), Some(BlockType::Vcard));
        assert_eq!(BlockType::parse("carousel"), None);
    }

    #[test]
    fn patch_ignores_fields_of_other_kinds() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut block = PageBlock::with_id("p1", BlockType::Poll, now);
        let patch = BlockPatch {
            url: Some("https://ignored.example".to_string()),
            question: Some("Tea or coffee?".to_string()),
            ..BlockPatch::default()
        };

        patch.apply_to(&mut block);

        match &block.content {
            BlockContent::Poll(poll) => {
                assert_eq!(poll.question, "Tea or coffee?");
                assert_eq!(poll.option_a, "Video");
            }
            other => panic!("unexpected content: {other:?}"),
        }
        assert_eq!(block.kind(), BlockType::Poll);
    }

    #[test]
    fn blank_schedule_bound_clears_it() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut block = PageBlock::with_id("l1", BlockType::Link, now);
        block.schedule_start = Some("2026-01-01T00:00".to_string());

        BlockPatch {
            schedule_start: Some("  ".to_string()),
            ..BlockPatch::default()
        }
        .apply_to(&mut block);

        assert_eq!(block.schedule_start, None);
    }

    #[test]
    fn schedule_window_is_inclusive_and_open_when_unset() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        let mut block = PageBlock::with_id("l1", BlockType::Link, now);
        assert!(block.is_scheduled_at(now));

        block.schedule_start = Some("2026-06-01T12:00:00Z".to_string());
        block.schedule_end = Some("2026-06-02T00:00:00Z".to_string());
        assert!(block.is_scheduled_at(now));
        assert!(!block.is_scheduled_at(now - Duration::seconds(1)));
        assert!(!block.is_scheduled_at(now + Duration::days(1)));
    }

    #[test]
    fn platform_filter_matches_targeted_viewers_only() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut block = PageBlock::with_id("l1", BlockType::Link, now);
        assert!(block.targets_platform(None));

        block.platform_target = Some(PlatformTarget::Ios);
        assert!(block.targets_platform(Some(PlatformTarget::Ios)));
        assert!(!block.targets_platform(Some(PlatformTarget::Android)));
        assert!(!block.targets_platform(None));
    }

    #[test]
    fn new_blocks_start_visible_without_animation() {
        let now = Utc::now();
        let block = PageBlock::new(BlockType::Gallery, now);
        assert!(block.visible);
        assert_eq!(block.animation, Animation::None);
        assert!(!block.id.is_empty());
    }

    #[test]
    fn vcard_payload_leaves_missing_fields_blank() {
        let card = VCardBlock {
            full_name: "Ada Lovelace".to_string(),
            phone: None,
            email: Some("ada@example.com".to_string()),
            button_label: "Save".to_string(),
        };

        assert_eq!(
            card.to_vcard(),
            "BEGIN:VCARD\nVERSION:3.0\nFN:Ada Lovelace\nTEL:\nEMAIL:ada@example.com\nEND:VCARD"
        );
        assert_eq!(card.file_name(), "Ada Lovelace.vcf");
    }
}
