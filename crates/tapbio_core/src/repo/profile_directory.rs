//! Hosted profile directory.
//!
//! # Responsibility
//! - Store published profile rows keyed by slug.
//! - Serve exact-match lookups for public page loads.
//!
//! # Invariants
//! - `upsert_profile` inserts or fully replaces the row for a slug.
//! - Lookups are exact on the stored slug; no normalization happens here.

use crate::model::published::PublishedProfile;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Storage contract for published profiles.
pub trait ProfileDirectory {
    fn upsert_profile(&self, record: &PublishedProfile) -> RepoResult<()>;
    fn find_by_slug(&self, slug: &str) -> RepoResult<Option<PublishedProfile>>;
}

/// SQLite-backed profile directory.
pub struct SqliteProfileDirectory<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProfileDirectory<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProfileDirectory for SqliteProfileDirectory<'_> {
    fn upsert_profile(&self, record: &PublishedProfile) -> RepoResult<()> {
        let blocks = serde_json::to_string(&record.blocks).map_err(RepoError::Encode)?;
        let theme = serde_json::to_string(&record.theme).map_err(RepoError::Encode)?;

        self.conn.execute(
            "INSERT INTO published_profiles (
                slug,
                display_name,
                bio,
                avatar_url,
                blocks,
                theme
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(slug) DO UPDATE SET
                display_name = excluded.display_name,
                bio = excluded.bio,
                avatar_url = excluded.avatar_url,
                blocks = excluded.blocks,
                theme = excluded.theme,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                record.slug.as_str(),
                record.display_name.as_str(),
                record.bio.as_str(),
                record.avatar_url.as_str(),
                blocks,
                theme,
            ],
        )?;
        Ok(())
    }

    fn find_by_slug(&self, slug: &str) -> RepoResult<Option<PublishedProfile>> {
        let mut stmt = self.conn.prepare(
            "SELECT slug, display_name, bio, avatar_url, blocks, theme
             FROM published_profiles
             WHERE slug = ?1;",
        )?;
        let row = stmt.query_row([slug], RawProfileRow::read).optional()?;
        row.map(RawProfileRow::decode).transpose()
    }
}

struct RawProfileRow {
    slug: String,
    display_name: String,
    bio: String,
    avatar_url: String,
    blocks: String,
    theme: String,
}

impl RawProfileRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            slug: row.get("slug")?,
            display_name: row.get("display_name")?,
            bio: row.get("bio")?,
            avatar_url: row.get("avatar_url")?,
            blocks: row.get("blocks")?,
            theme: row.get("theme")?,
        })
    }

    fn decode(self) -> RepoResult<PublishedProfile> {
        let blocks = serde_json::from_str(&self.blocks).map_err(|err| {
            RepoError::InvalidData(format!(
                "invalid blocks JSON for slug `{}`: {err}",
                self.slug
            ))
        })?;
        let theme = serde_json::from_str(&self.theme).map_err(|err| {
            RepoError::InvalidData(format!("invalid theme JSON for slug `{}`: {err}", self.slug))
        })?;

        Ok(PublishedProfile {
            slug: self.slug,
            display_name: self.display_name,
            bio: self.bio,
            avatar_url: self.avatar_url,
            blocks,
            theme,
        })
    }
}
