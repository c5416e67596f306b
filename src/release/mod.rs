//! Creating a GitHub release for a published project
//!
//! An optional screenshot is staged under `screenshots/`, referenced from the
//! README and pushed before `gh release create` runs. Release notes travel
//! through a temporary file that is removed whatever the outcome.

mod auto;
mod pipeline;
mod screenshot;

pub use auto::AutoRelease;
pub use pipeline::{ReleasePipeline, ReleaseRequest, NOTES_FILE};
pub use screenshot::{
    is_attachable, stage_screenshot, upsert_screenshot_section, StagedScreenshot, MAX_ASSET_BYTES,
    SCREENSHOTS_DIR, SCREENSHOT_HEADING,
};
