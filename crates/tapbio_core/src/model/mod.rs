//! Page aggregate data model.
//!
//! # Responsibility
//! - Define the profile, block, theme and SEO records edited by the studio.
//! - Keep the JSON wire shape compatible with persisted/shared snapshots.
//!
//! # Invariants
//! - Block ids are unique within one snapshot and never reused.
//! - `visible` and `animation` are always present on every block.
//! - The aggregate is serialized and restored as one `Snapshot`.

pub mod block;
pub mod profile;
pub mod published;
pub mod snapshot;
pub mod theme;
pub mod time;
