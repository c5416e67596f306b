//! README and release-notes drafting
//!
//! [`DocumentGenerator`] turns a [`ProjectDescription`](crate::classify::ProjectDescription)
//! into README text, either through the assistant or through the deterministic
//! renderer in [`render_readme`]. It also drafts [`ReleaseData`] from the
//! assistant's JSON answer, falling back to fixed defaults.

mod generator;
mod prompt;
mod release_info;
mod render;

pub use generator::DocumentGenerator;
pub use prompt::{readme_prompt, release_notes_prompt};
pub use release_info::{
    parse_release_info, ReleaseData, ReleaseInfoParse, DEFAULT_RELEASE_NOTES, DEFAULT_RELEASE_TAG,
    DEFAULT_RELEASE_TITLE,
};
pub use render::{render_readme, OVERVIEW_HEADING};
