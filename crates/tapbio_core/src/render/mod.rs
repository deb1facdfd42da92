//! Page preview rendering.
//!
//! # Responsibility
//! - Turn a snapshot plus a render context into a `PageView` tree.
//! - Serialize the view tree to a standalone HTML document (`html`).
//!
//! # Invariants
//! - Rendering is pure: the same snapshot and context give the same view.
//! - Editor mode selects blocks by `visible` only; public mode also applies
//!   the schedule window and platform filter.
//! - User-supplied URLs that are not http(s), mailto, tel or relative are
//!   rendered as `#`.

pub mod html;
pub mod style;

use crate::model::block::{BlockContent, PageBlock, PlatformTarget, TipService};
use crate::model::profile::UserProfile;
use crate::model::snapshot::Snapshot;
use crate::model::theme::ThemeSettings;
use crate::model::time::{days_remaining, parse_timestamp};
use chrono::{DateTime, Utc};

pub use style::{animation_class, BackgroundView, CardStyle, CardTone, Overlay};

pub const FALLBACK_AVATAR_URL: &str = "https://picsum.photos/200";
pub const FALLBACK_DISPLAY_NAME: &str = "Display Name";
pub const FALLBACK_BIO: &str = "Your short bio goes here.";
pub const EMPTY_BLOCKS_MESSAGE: &str = "No visible blocks.";
pub const FOOTER_TEXT: &str = "Powered by AndoKore";
pub const DEFAULT_COPY_MESSAGE: &str = "Copied!";
pub const FALLBACK_ICON: &str = "Link";

/// Icon names the preview knows how to draw.
const KNOWN_ICONS: &[&str] = &[
    "Link",
    "Globe",
    "Mail",
    "Phone",
    "Instagram",
    "Twitter",
    "Youtube",
    "Facebook",
    "Linkedin",
    "Github",
    "Twitch",
    "Music",
    "Video",
    "Camera",
    "Mic",
    "Podcast",
    "ShoppingBag",
    "ShoppingCart",
    "Store",
    "Coffee",
    "Heart",
    "Star",
    "Gift",
    "Calendar",
    "MapPin",
    "BookOpen",
    "Newspaper",
    "FileText",
    "Download",
    "MessageCircle",
    "Send",
    "Briefcase",
];

/// Which page variant is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Live preview inside the editor.
    Editor,
    /// Read-only page seen by a visitor on `platform` (unknown when `None`).
    Public { platform: Option<PlatformTarget> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub now: DateTime<Utc>,
    pub mode: RenderMode,
}

impl RenderContext {
    pub fn editor(now: DateTime<Utc>) -> Self {
        Self {
            now,
            mode: RenderMode::Editor,
        }
    }

    pub fn public(now: DateTime<Utc>, platform: Option<PlatformTarget>) -> Self {
        Self {
            now,
            mode: RenderMode::Public { platform },
        }
    }

    /// Whether `block` is part of the page in this context.
    pub fn shows(&self, block: &PageBlock) -> bool {
        if !block.visible {
            return false;
        }
        match self.mode {
            RenderMode::Editor => true,
            RenderMode::Public { platform } => {
                block.is_scheduled_at(self.now) && block.targets_platform(platform)
            }
        }
    }
}

/// Profile header with fallbacks applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub avatar_url: String,
    pub display_name: String,
    pub bio: String,
    pub header_font_class: &'static str,
    pub body_font_class: &'static str,
}

impl HeaderView {
    pub fn new(profile: &UserProfile, theme: &ThemeSettings) -> Self {
        Self {
            avatar_url: or_fallback(&profile.avatar_url, FALLBACK_AVATAR_URL),
            display_name: or_fallback(&profile.display_name, FALLBACK_DISPLAY_NAME),
            bio: or_fallback(&profile.bio, FALLBACK_BIO),
            header_font_class: theme.font_header.css_class(),
            body_font_class: theme.font_body.css_class(),
        }
    }
}

/// Kind-specific content of a rendered block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockBody {
    Link {
        href: String,
        icon: String,
        title: String,
    },
    Countdown {
        title: String,
        days_left: i64,
    },
    Poll {
        question: String,
        option_a: String,
        option_b: String,
    },
    Tip {
        service: TipService,
        headline: String,
    },
    Image {
        src: String,
        alt: String,
        caption: Option<String>,
    },
    Gallery {
        images: Vec<String>,
        radius_px: u32,
    },
    Copy {
        label: String,
        content: String,
        success_message: String,
    },
    ContactCard {
        button_label: String,
        vcard: String,
        file_name: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockView {
    pub id: String,
    pub animation_class: Option<&'static str>,
    /// `None` for kinds drawn without a card (gallery strip).
    pub card: Option<CardStyle>,
    pub body: BlockBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub background: BackgroundView,
    pub header: HeaderView,
    pub blocks: Vec<BlockView>,
    /// Set when no block passed selection.
    pub empty_message: Option<&'static str>,
    pub footer: &'static str,
}

/// Renders the page for `snapshot` in `ctx`.
pub fn render_page(snapshot: &Snapshot, ctx: &RenderContext) -> PageView {
    render_parts(&snapshot.profile, &snapshot.blocks, &snapshot.theme, ctx)
}

/// Same as `render_page`, over borrowed aggregate parts.
pub fn render_parts(
    profile: &UserProfile,
    blocks: &[PageBlock],
    theme: &ThemeSettings,
    ctx: &RenderContext,
) -> PageView {
    let blocks: Vec<BlockView> = blocks
        .iter()
        .filter(|block| ctx.shows(block))
        .map(|block| render_block(block, theme, ctx.now))
        .collect();
    let empty_message = blocks.is_empty().then_some(EMPTY_BLOCKS_MESSAGE);

    PageView {
        background: BackgroundView::for_theme(theme),
        header: HeaderView::new(profile, theme),
        blocks,
        empty_message,
        footer: FOOTER_TEXT,
    }
}

fn render_block(block: &PageBlock, theme: &ThemeSettings, now: DateTime<Utc>) -> BlockView {
    let surface = CardStyle::for_theme(theme, CardTone::Surface);
    let (card, body) = match &block.content {
        BlockContent::Link(link) => (
            Some(surface),
            BlockBody::Link {
                href: safe_href(&link.url),
                icon: resolve_icon(&link.icon).to_string(),
                title: link.title.clone(),
            },
        ),
        BlockContent::Countdown(countdown) => (
            Some(CardStyle::for_theme(theme, CardTone::Dark)),
            BlockBody::Countdown {
                title: countdown.title.clone(),
                days_left: countdown_days(&countdown.target_date, now),
            },
        ),
        BlockContent::Poll(poll) => (
            Some(surface),
            BlockBody::Poll {
                question: poll.question.clone(),
                option_a: poll.option_a.clone(),
                option_b: poll.option_b.clone(),
            },
        ),
        BlockContent::Tip(tip) => (
            Some(CardStyle::for_theme(theme, CardTone::Tip)),
            BlockBody::Tip {
                service: tip.service,
                headline: format!("Support me on {}", tip.service.as_str()),
            },
        ),
        BlockContent::Image(image) => (
            Some(surface.flush()),
            BlockBody::Image {
                src: safe_href(&image.url),
                alt: image.alt.clone().unwrap_or_default(),
                caption: image.caption.clone().filter(|caption| !caption.is_empty()),
            },
        ),
        BlockContent::Gallery(gallery) => (
            None,
            BlockBody::Gallery {
                images: gallery.images.iter().map(|url| safe_href(url)).collect(),
                radius_px: theme.border_radius,
            },
        ),
        BlockContent::Copy(copy) => (
            Some(surface),
            BlockBody::Copy {
                label: copy.label.clone(),
                content: copy.content.clone(),
                success_message: copy
                    .success_message
                    .clone()
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| DEFAULT_COPY_MESSAGE.to_string()),
            },
        ),
        BlockContent::Vcard(card) => (
            Some(CardStyle::for_theme(theme, CardTone::Dark)),
            BlockBody::ContactCard {
                button_label: card.button_label.clone(),
                vcard: card.to_vcard(),
                file_name: card.file_name(),
            },
        ),
    };

    BlockView {
        id: block.id.clone(),
        animation_class: animation_class(block.animation),
        card,
        body,
    }
}

/// Whole days left until `target_date`; unparseable dates count as 0.
pub fn countdown_days(target_date: &str, now: DateTime<Utc>) -> i64 {
    parse_timestamp(target_date)
        .map(|target| days_remaining(target, now))
        .unwrap_or(0)
}

/// Icon name to draw for `name`, falling back to `Link`.
pub fn resolve_icon(name: &str) -> &str {
    KNOWN_ICONS
        .iter()
        .copied()
        .find(|known| *known == name)
        .unwrap_or(FALLBACK_ICON)
}

/// Returns `url` when it is safe to put in `href`/`src`, else `#`.
///
/// `data:image/` URLs are accepted so uploaded avatars keep working.
pub fn safe_href(url: &str) -> String {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();
    let allowed = ["http://", "https://", "mailto:", "tel:", "data:image/"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
        || is_relative(trimmed);
    if allowed {
        trimmed.to_string()
    } else {
        "#".to_string()
    }
}

fn is_relative(url: &str) -> bool {
    if url.is_empty() || url.starts_with("//") {
        return false;
    }
    if url.starts_with('/') || url.starts_with('#') || url.starts_with('?') {
        return true;
    }
    // No scheme before the first path separator.
    match url.find(':') {
        Some(colon) => url[..colon].contains('/'),
        None => true,
    }
}

fn or_fallback(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        countdown_days, render_page, resolve_icon, safe_href, BlockBody, RenderContext,
        EMPTY_BLOCKS_MESSAGE, FALLBACK_BIO, FALLBACK_DISPLAY_NAME,
    };
    use crate::model::block::{BlockType, PageBlock, PlatformTarget};
    use crate::model::profile::UserProfile;
    use crate::model::snapshot::Snapshot;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn countdown_days_floor_and_never_negative() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(countdown_days("2026-03-04T11:59:59Z", now), 2);
        assert_eq!(countdown_days("2026-03-04T12:00:00Z", now), 3);
        assert_eq!(countdown_days("2026-02-01T00:00:00Z", now), 0);
        assert_eq!(countdown_days("soon", now), 0);
    }

    #[test]
    fn unknown_icons_fall_back_to_link() {
        assert_eq!(resolve_icon("Globe"), "Globe");
        assert_eq!(resolve_icon("NotAnIcon"), "Link");
        assert_eq!(resolve_icon(""), "Link");
    }

    #[test]
    fn unsafe_urls_render_as_hash() {
        assert_eq!(safe_href("javascript:alert(1)"), "#");
        assert_eq!(safe_href(" JavaScript:alert(1)"), "#");
        assert_eq!(safe_href("https://example.com"), "https://example.com");
        assert_eq!(safe_href("mailto:me@example.com"), "mailto:me@example.com");
        assert_eq!(safe_href("/about"), "/about");
        assert_eq!(safe_href("docs/a:b"), "docs/a:b");
        assert_eq!(safe_href(""), "#");
    }

    #[test]
    fn empty_profile_uses_fallbacks() {
        let mut snapshot = Snapshot::seeded(Utc::now());
        snapshot.profile = UserProfile {
            display_name: String::new(),
            bio: String::new(),
            avatar_url: String::new(),
        };
        let view = render_page(&snapshot, &RenderContext::editor(Utc::now()));

        assert_eq!(view.header.display_name, FALLBACK_DISPLAY_NAME);
        assert_eq!(view.header.bio, FALLBACK_BIO);
        assert_eq!(view.header.header_font_class, "font-sans");
    }

    #[test]
    fn hidden_blocks_leave_empty_message() {
        let mut snapshot = Snapshot::seeded(Utc::now());
        for block in &mut snapshot.blocks {
            block.visible = false;
        }
        let view = render_page(&snapshot, &RenderContext::editor(Utc::now()));

        assert!(view.blocks.is_empty());
        assert_eq!(view.empty_message, Some(EMPTY_BLOCKS_MESSAGE));
    }

    #[test]
    fn public_mode_applies_schedule_and_platform() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
        let mut later = PageBlock::with_id("later", BlockType::Link, now);
        later.schedule_start = Some("2026-05-02T00:00:00Z".to_string());
        let mut ios = PageBlock::with_id("ios", BlockType::Link, now);
        ios.platform_target = Some(PlatformTarget::Ios);
        let always = PageBlock::with_id("always", BlockType::Poll, now);

        let mut snapshot = Snapshot::seeded(now);
        snapshot.blocks = vec![later, ios, always];

        let ids = |ctx: RenderContext| -> Vec<String> {
            render_page(&snapshot, &ctx)
                .blocks
                .into_iter()
                .map(|view| view.id)
                .collect()
        };

        assert_eq!(ids(RenderContext::editor(now)), vec!["later", "ios", "always"]);
        assert_eq!(ids(RenderContext::public(now, None)), vec!["always"]);
        assert_eq!(
            ids(RenderContext::public(now, Some(PlatformTarget::Ios))),
            vec!["ios", "always"]
        );
        assert_eq!(
            ids(RenderContext::public(now + Duration::days(2), Some(PlatformTarget::Android))),
            vec!["later", "always"]
        );
    }

    #[test]
    fn tip_and_gallery_bodies_follow_theme() {
        let now = Utc::now();
        let mut snapshot = Snapshot::seeded(now);
        snapshot.blocks = vec![
            PageBlock::with_id("t", BlockType::Tip, now),
            PageBlock::with_id("g", BlockType::Gallery, now),
        ];
        let view = render_page(&snapshot, &RenderContext::editor(now));

        match &view.blocks[0].body {
            BlockBody::Tip { headline, .. } => assert_eq!(headline, "Support me on kofi"),
            other => panic!("unexpected body: {other:?}"),
        }
        assert!(view.blocks[1].card.is_none());
        match &view.blocks[1].body {
            BlockBody::Gallery { images, radius_px } => {
                assert_eq!(images.len(), 2);
                assert_eq!(*radius_px, 16);
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }
}
