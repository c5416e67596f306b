//! Release data and parsing of the assistant's JSON answer

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_RELEASE_TAG: &str = "v1.0.0";
pub const DEFAULT_RELEASE_TITLE: &str = "Release v1.0.0";
pub const DEFAULT_RELEASE_NOTES: &str =
    "## What's new\n- Core functionality implemented\n- Critical bugs fixed";

/// Tag, title and notes of a release to create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseData {
    pub tag: String,
    pub title: Option<String>,
    pub notes: Option<String>,
}

impl ReleaseData {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            title: None,
            notes: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Rejects a blank tag, and one `gh` would read as an option
    pub fn validate(&self) -> Result<(), PipelineError> {
        let tag = self.tag.trim();
        if tag.is_empty() {
            return Err(PipelineError::InvalidRelease(
                "release tag must not be empty".to_string(),
            ));
        }
        if tag.starts_with('-') {
            return Err(PipelineError::InvalidRelease(format!(
                "release tag must not start with '-': {}",
                tag
            )));
        }
        Ok(())
    }

    /// Title if present and non-blank
    pub fn title(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }

    /// Notes if present and non-blank
    pub fn notes(&self) -> Option<&str> {
        non_blank(self.notes.as_deref())
    }
}

impl Default for ReleaseData {
    fn default() -> Self {
        Self::new(DEFAULT_RELEASE_TAG)
            .with_title(DEFAULT_RELEASE_TITLE)
            .with_notes(DEFAULT_RELEASE_NOTES)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Outcome of extracting release data from generated text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseInfoParse {
    Parsed(ReleaseData),
    /// A `{...}` span was found but is not a valid release object
    Malformed(String),
    /// No `{...}` span in the text
    Absent,
}

impl ReleaseInfoParse {
    /// Parsed data, or the default release for the other outcomes
    pub fn into_release_data(self) -> ReleaseData {
        match self {
            ReleaseInfoParse::Parsed(data) => data,
            ReleaseInfoParse::Malformed(_) | ReleaseInfoParse::Absent => ReleaseData::default(),
        }
    }
}

#[derive(Deserialize)]
struct RawReleaseInfo {
    tag: Option<String>,
    title: Option<String>,
    notes: Option<String>,
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Extracts release data from the greedy span between the first `{` and the last `}`
///
/// Fields missing or empty in a parsed object take their individual defaults.
pub fn parse_release_info(text: &str) -> ReleaseInfoParse {
    let (start, end) = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => (start, end),
        _ => return ReleaseInfoParse::Absent,
    };

    match serde_json::from_str::<RawReleaseInfo>(&text[start..=end]) {
        Ok(raw) => ReleaseInfoParse::Parsed(ReleaseData {
            tag: or_default(
                raw.tag.filter(|tag| !tag.trim_start().starts_with('-')),
                DEFAULT_RELEASE_TAG,
            ),
            title: Some(or_default(raw.title, DEFAULT_RELEASE_TITLE)),
            notes: Some(or_default(raw.notes, DEFAULT_RELEASE_NOTES)),
        }),
        Err(e) => ReleaseInfoParse::Malformed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_embedded_json() {
        let text = "Sure! Here it is:\n```json\n{\"tag\": \"v0.3.0\", \"title\": \"First cut\", \"notes\": \"## What's new\\n- CLI\"}\n```";

        let parsed = parse_release_info(text);

        assert_eq!(
            parsed,
            ReleaseInfoParse::Parsed(
                ReleaseData::new("v0.3.0")
                    .with_title("First cut")
                    .with_notes("## What's new\n- CLI")
            )
        );
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let parsed = parse_release_info("{\"tag\": \"\", \"title\": \"Hello\"}").into_release_data();

        assert_eq!(parsed.tag, DEFAULT_RELEASE_TAG);
        assert_eq!(parsed.title(), Some("Hello"));
        assert_eq!(parsed.notes(), Some(DEFAULT_RELEASE_NOTES));
    }

    #[test]
    fn test_absent_and_malformed_fall_back() {
        assert_eq!(parse_release_info("no json here"), ReleaseInfoParse::Absent);
        assert_eq!(parse_release_info("} backwards {"), ReleaseInfoParse::Absent);

        let malformed = parse_release_info("{tag: v1}");
        assert!(matches!(malformed, ReleaseInfoParse::Malformed(_)));
        assert_eq!(malformed.into_release_data(), ReleaseData::default());
    }

    #[test]
    fn test_greedy_span_spans_two_objects() {
        let parsed = parse_release_info("{\"tag\": \"a\"} and {\"tag\": \"b\"}");
        assert!(matches!(parsed, ReleaseInfoParse::Malformed(_)));
    }

    #[test]
    fn test_validate_rejects_blank_tag() {
        assert!(ReleaseData::new("  ").validate().is_err());
        assert!(ReleaseData::new("v1").validate().is_ok());
        assert_eq!(ReleaseData::new("v1").with_title(" ").title(), None);
    }

    #[test]
    fn test_validate_rejects_option_like_tag() {
        let err = ReleaseData::new("--draft").validate().unwrap_err();
        assert!(matches!(err, PipelineError::InvalidRelease(_)));
        assert!(ReleaseData::new(" -v1").validate().is_err());
        assert!(ReleaseData::new("v1-rc.1").validate().is_ok());
    }

    #[test]
    fn test_option_like_drafted_tag_takes_default() {
        let parsed =
            parse_release_info("{\"tag\": \"--draft\", \"title\": \"x\"}").into_release_data();
        assert_eq!(parsed.tag, DEFAULT_RELEASE_TAG);
    }
}
