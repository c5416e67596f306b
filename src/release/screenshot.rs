use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const SCREENSHOTS_DIR: &str = "screenshots";
pub const SCREENSHOT_HEADING: &str = "## 📸 Screenshots";

/// GitHub's per-asset upload limit (2 GiB)
pub const MAX_ASSET_BYTES: u64 = 2 * 1024 * 1024 * 1024;

/// A screenshot copied into the project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedScreenshot {
    pub path: PathBuf,
    /// `screenshots/<file name>`, as referenced from the README and `gh`
    pub relative: String,
}

/// Copies `source` into `<root>/screenshots/`, unless it already is that file
pub fn stage_screenshot(root: &Path, source: &Path) -> io::Result<StagedScreenshot> {
    let file_name = source.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", source.display()),
        )
    })?;

    let dir = root.join(SCREENSHOTS_DIR);
    fs::create_dir_all(&dir)?;
    let destination = dir.join(file_name);

    if !is_same_file(source, &destination) {
        fs::copy(source, &destination)?;
    }

    Ok(StagedScreenshot {
        relative: format!("{}/{}", SCREENSHOTS_DIR, file_name.to_string_lossy()),
        path: destination,
    })
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Whether the file fits under [`MAX_ASSET_BYTES`]
pub fn is_attachable(path: &Path) -> io::Result<bool> {
    Ok(fs::metadata(path)?.len() <= MAX_ASSET_BYTES)
}

fn is_heading(line: &str) -> bool {
    line.starts_with("## ")
}

fn is_screenshot_heading(line: &str) -> bool {
    is_heading(line) && line.to_lowercase().contains("screenshot")
}

fn is_overview_heading(line: &str) -> bool {
    is_heading(line) && line.to_lowercase().contains("overview")
}

fn section_end(lines: &[&str], heading: usize) -> usize {
    lines[heading + 1..]
        .iter()
        .position(|line| is_heading(line))
        .map_or(lines.len(), |offset| heading + 1 + offset)
}

/// `relative` as a CommonMark link destination; spaces and brackets are percent-encoded
fn link_destination(relative: &str) -> String {
    let mut out = String::with_capacity(relative.len());
    for c in relative.chars() {
        match c {
            ' ' => out.push_str("%20"),
            '(' => out.push_str("%28"),
            ')' => out.push_str("%29"),
            '<' => out.push_str("%3C"),
            '>' => out.push_str("%3E"),
            _ => out.push(c),
        }
    }
    out
}

/// Replaces every screenshot section with one pointing at `relative`
///
/// Only the old section body is removed; content after it is kept. The new
/// section goes after the overview section, else before the first `## `
/// heading, else at the end.
pub fn upsert_screenshot_section(content: &str, relative: &str) -> String {
    let mut lines: Vec<&str> = content.lines().collect();
    while let Some(start) = lines.iter().position(|line| is_screenshot_heading(line)) {
        let end = section_end(&lines, start);
        lines.drain(start..end);
    }

    let insert_at = lines
        .iter()
        .position(|line| is_overview_heading(line))
        .map(|overview| section_end(&lines, overview))
        .or_else(|| lines.iter().position(|line| is_heading(line)))
        .unwrap_or(lines.len());

    let before = lines[..insert_at].join("\n");
    let after = lines[insert_at..].join("\n");
    let section = format!(
        "{}\n\n![Screenshot]({})\n",
        SCREENSHOT_HEADING,
        link_destination(relative)
    );

    let mut out = String::new();
    let before = before.trim_end();
    if !before.is_empty() {
        out.push_str(before);
        out.push_str("\n\n");
    }
    out.push_str(&section);
    if !after.trim().is_empty() {
        out.push('\n');
        out.push_str(&after);
        out.push('\n');
    }
    out
}
