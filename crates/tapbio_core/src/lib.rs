//! Core domain logic for TapBio Studio.
//! This crate owns the page aggregate, its persistence and its rendering.

pub mod assistant;
pub mod config;
pub mod db;
pub mod logging;
pub mod media;
pub mod model;
pub mod render;
pub mod repo;
pub mod service;
pub mod share;
pub mod store;

pub use assistant::{ChatError, ChatMessage, ChatProvider, ChatRequest, ChatRole, ChatSession};
pub use config::{ConfigError, ConfigOverrides, StudioConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use media::{read_image_data_url, MediaError};
pub use model::block::{
    Animation, BlockContent, BlockId, BlockPatch, BlockType, PageBlock, PlatformTarget,
    TipService,
};
pub use model::profile::{ProfilePatch, SeoPatch, SeoSettings, UserProfile};
pub use model::published::PublishedProfile;
pub use model::snapshot::{Snapshot, SnapshotValidationError};
pub use model::theme::{ThemePatch, ThemePreset, ThemeSettings};
pub use render::html::render_html;
pub use render::{render_page, PageView, RenderContext, RenderMode};
pub use repo::profile_directory::{ProfileDirectory, SqliteProfileDirectory};
pub use repo::snapshot_repo::{SnapshotRepository, SqliteSnapshotRepository, STORAGE_KEY};
pub use repo::{RepoError, RepoResult};
pub use service::editor_session::{EditorSession, SessionOrigin};
pub use service::publish_service::{slug_from_path, slugify, PublishError, PublishService};
pub use share::{decode_share_token, encode_share_token, public_url, share_url, ShareError};
pub use store::PageStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
