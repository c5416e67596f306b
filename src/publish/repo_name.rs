//! Repository names accepted by `gh repo view` and `gh repo create`

use crate::error::PipelineError;
use regex::Regex;
use std::sync::OnceLock;

/// `NAME` or `OWNER/NAME`; no segment may start with `-`
fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:[A-Za-z0-9._][A-Za-z0-9._-]{0,99}/)?[A-Za-z0-9._][A-Za-z0-9._-]{0,99}$")
            .expect("valid regex")
    })
}

pub fn validate_repo_name(name: &str) -> Result<(), PipelineError> {
    let dot_segment = name.split('/').any(|segment| segment == "." || segment == "..");
    if !pattern().is_match(name) || dot_segment {
        return Err(PipelineError::InvalidRepoName(name.to_string()));
    }
    Ok(())
}
