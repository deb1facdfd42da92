//! Publish use-case service.
//!
//! # Responsibility
//! - Derive the public slug from the profile display name.
//! - Upsert the hosted profile record and resolve public page paths.
//!
//! # Invariants
//! - A slug only contains `[a-z0-9-]`, never starts or ends with `-`, and is
//!   never empty.
//! - Publishing the same display name twice replaces the earlier record.

use crate::model::published::PublishedProfile;
use crate::model::snapshot::Snapshot;
use crate::repo::profile_directory::ProfileDirectory;
use crate::repo::RepoError;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static NON_SLUG_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug separator regex"));
static SLUG_SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"));

/// Service error for publish use-cases.
#[derive(Debug)]
pub enum PublishError {
    /// Display name has no slug characters at all.
    EmptySlug { display_name: String },
    /// Directory write or read failed.
    Repo(RepoError),
}

impl Display for PublishError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySlug { display_name } => write!(
                f,
                "cannot publish: display name `{display_name}` has no letters or digits to build a profile URL from"
            ),
            Self::Repo(err) => write!(f, "cannot publish: {err}"),
        }
    }
}

impl Error for PublishError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptySlug { .. } => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for PublishError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Lowercases `display_name` and joins its letter/digit runs with `-`.
///
/// Returns `None` when nothing slug-worthy remains.
pub fn slugify(display_name: &str) -> Option<String> {
    let lower = display_name.to_lowercase();
    let slug = NON_SLUG_RUN_RE.replace_all(&lower, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        None
    } else {
        Some(slug.to_string())
    }
}

/// Returns the slug when `path` is a single username-like segment.
///
/// `/jane-doe` and `jane-doe/` qualify; `/`, `/a/b` and `/Jane` do not.
pub fn slug_from_path(path: &str) -> Option<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segment = path.trim_matches('/');
    if segment.contains('/') || !SLUG_SEGMENT_RE.is_match(segment) {
        return None;
    }
    Some(segment)
}

/// Use-case service for the hosted profile directory.
pub struct PublishService<D: ProfileDirectory> {
    directory: D,
}

impl<D: ProfileDirectory> PublishService<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    /// Publishes `snapshot` and returns the slug it is reachable under.
    ///
    /// # Errors
    /// - `EmptySlug` when the display name yields no slug.
    /// - `Repo` when the directory write fails; nothing is retried.
    pub fn publish(&self, snapshot: &Snapshot) -> Result<String, PublishError> {
        let display_name = &snapshot.profile.display_name;
        let Some(slug) = slugify(display_name) else {
            warn!("event=publish module=service status=error reason=empty_slug");
            return Err(PublishError::EmptySlug {
                display_name: display_name.clone(),
            });
        };

        let record = PublishedProfile::from_snapshot(slug.clone(), snapshot);
        if let Err(err) = self.directory.upsert_profile(&record) {
            warn!(
                "event=publish module=service status=error slug={} error={}",
                slug, err
            );
            return Err(err.into());
        }

        info!(
            "event=publish module=service status=ok slug={} blocks={}",
            slug,
            record.blocks.len()
        );
        Ok(slug)
    }

    /// Loads the published profile addressed by `path`.
    ///
    /// Paths that do not look like a username resolve to `Ok(None)` without
    /// touching the directory.
    pub fn load_public(&self, path: &str) -> Result<Option<PublishedProfile>, PublishError> {
        let Some(slug) = slug_from_path(path) else {
            return Ok(None);
        };
        let found = self.directory.find_by_slug(slug)?;
        info!(
            "event=load_public module=service status=ok slug={} found={}",
            slug,
            found.is_some()
        );
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::{slug_from_path, slugify};

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Jane Doe").as_deref(), Some("jane-doe"));
        assert_eq!(slugify("  TapBio -- Creator!! ").as_deref(), Some("tapbio-creator"));
        assert_eq!(slugify("Ünïcode Nâme 42").as_deref(), Some("n-code-n-me-42"));
        assert_eq!(slugify("***"), None);
        assert_eq!(slugify(""), None);
    }

    #[test]
    fn slug_from_path_accepts_single_segment() {
        assert_eq!(slug_from_path("/jane-doe"), Some("jane-doe"));
        assert_eq!(slug_from_path("jane-doe/"), Some("jane-doe"));
        assert_eq!(slug_from_path("/jane-doe?view=public"), Some("jane-doe"));
        assert_eq!(slug_from_path("/"), None);
        assert_eq!(slug_from_path("/a/b"), None);
        assert_eq!(slug_from_path("/Jane"), None);
        assert_eq!(slug_from_path("/-jane"), None);
    }
}
