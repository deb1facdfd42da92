//! Profile header and SEO records.
//!
//! Both records are mutated by shallow merge only. Nothing here is
//! validated; the description length guideline is advisory.

use serde::{Deserialize, Serialize};

/// Soft length guideline for `meta_description`, in characters.
pub const META_DESCRIPTION_GUIDELINE: usize = 160;

/// Profile header shown above the blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub display_name: String,
    pub bio: String,
    /// Image URL or `data:` URL from an uploaded file.
    pub avatar_url: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            display_name: "TapBio Creator".to_string(),
            bio: "Digital Creator & Minimalist".to_string(),
            avatar_url: "https://picsum.photos/200".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilePatch {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

impl ProfilePatch {
    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(display_name) = &self.display_name {
            profile.display_name.clone_from(display_name);
        }
        if let Some(bio) = &self.bio {
            profile.bio.clone_from(bio);
        }
        if let Some(avatar_url) = &self.avatar_url {
            profile.avatar_url.clone_from(avatar_url);
        }
    }
}

/// Search/link-preview metadata for the published page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoSettings {
    pub page_title: String,
    pub meta_description: String,
}

impl Default for SeoSettings {
    fn default() -> Self {
        Self {
            page_title: "TapBio".to_string(),
            meta_description: "Check out my links and updates.".to_string(),
        }
    }
}

impl SeoSettings {
    /// Description length in characters, as shown by the `n/160` counter.
    pub fn description_len(&self) -> usize {
        self.meta_description.chars().count()
    }

    pub fn exceeds_guideline(&self) -> bool {
        self.description_len() > META_DESCRIPTION_GUIDELINE
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoPatch {
    pub page_title: Option<String>,
    pub meta_description: Option<String>,
}

impl SeoPatch {
    pub fn apply_to(&self, seo: &mut SeoSettings) {
        if let Some(page_title) = &self.page_title {
            seo.page_title.clone_from(page_title);
        }
        if let Some(meta_description) = &self.meta_description {
            seo.meta_description.clone_from(meta_description);
        }
    }
}
