//! Hosted profile record.
//!
//! A published page is stored as one row keyed by slug. SEO fields are not
//! part of the hosted record, so reconstructing a snapshot derives them
//! from the profile header.

use crate::model::block::PageBlock;
use crate::model::profile::{SeoSettings, UserProfile};
use crate::model::snapshot::Snapshot;
use crate::model::theme::ThemeSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedProfile {
    pub slug: String,
    pub display_name: String,
    pub bio: String,
    pub avatar_url: String,
    pub blocks: Vec<PageBlock>,
    pub theme: ThemeSettings,
}

impl PublishedProfile {
    pub fn from_snapshot(slug: impl Into<String>, snapshot: &Snapshot) -> Self {
        Self {
            slug: slug.into(),
            display_name: snapshot.profile.display_name.clone(),
            bio: snapshot.profile.bio.clone(),
            avatar_url: snapshot.profile.avatar_url.clone(),
            blocks: snapshot.blocks.clone(),
            theme: snapshot.theme.clone(),
        }
    }

    /// Rebuilds a renderable snapshot; title/description mirror name/bio.
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            profile: UserProfile {
                display_name: self.display_name.clone(),
                bio: self.bio.clone(),
                avatar_url: self.avatar_url.clone(),
            },
            blocks: self.blocks.clone(),
            theme: self.theme.clone(),
            seo: SeoSettings {
                page_title: self.display_name.clone(),
                meta_description: self.bio.clone(),
            },
        }
    }
}
