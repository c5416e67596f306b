//! Recursive walk collecting files, technologies, entry point and platforms

use super::types::Platform;
use crate::progress::ProgressHandler;
use ignore::WalkBuilder;
use std::collections::BTreeSet;
use std::path::{Component, Path};

/// Name fragments that mark a file as a main project file
const MAIN_FILE_MARKERS: &[&str] = &[
    ".py", ".js", ".html", ".css", ".json", ".md", ".java", ".cpp", ".cc", ".h",
];

const PYTHON_ENTRY_POINTS: &[&str] = &["main.py", "app.py", "run.py", "start.py", "manage.py"];
const JS_ENTRY_POINTS: &[&str] = &["index.js", "main.js", "server.js", "app.js"];
const JAVA_ENTRY_POINTS: &[&str] = &["Main.java", "App.java"];
const CPP_ENTRY_POINTS: &[&str] = &["main.cpp", "main.cc"];

/// Version-control metadata is never part of the project tree
const SKIPPED_DIRS: &[&str] = &[".git"];

/// Facts gathered from one walk over the project tree
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct TreeScan {
    pub main_files: Vec<String>,
    pub technologies: BTreeSet<String>,
    pub entry_point: Option<String>,
    pub platforms: BTreeSet<Platform>,
}

impl TreeScan {
    pub(crate) fn run(root: &Path, progress: &dyn ProgressHandler) -> Self {
        let mut scan = TreeScan::default();

        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(|entry| {
                let name = entry.file_name().to_string_lossy();
                !SKIPPED_DIRS.contains(&name.as_ref())
            })
            .build();

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    progress.log(&format!("Failed to read directory entry: {}", err));
                    continue;
                }
            };
            if entry.depth() == 0 {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().into_owned();
            let is_file = entry.file_type().is_some_and(|t| t.is_file());

            // Bundles such as `Tool.app` are directories on macOS.
            if let Some(platform) = Platform::from_installer_name(&file_name) {
                scan.platforms.insert(platform);
            }

            if !is_file {
                continue;
            }

            let relative = relative_path(root, entry.path());
            scan.observe_file(&file_name, relative);
        }

        scan
    }

    fn observe_file(&mut self, file_name: &str, relative: String) {
        if MAIN_FILE_MARKERS.iter().any(|m| file_name.contains(m)) {
            self.main_files.push(relative.clone());
        }

        if let Some((technology, entry_points)) = technology_for(file_name) {
            self.technologies.insert(technology.to_string());
            if self.entry_point.is_none() && entry_points.contains(&file_name) {
                self.entry_point = Some(relative);
            }
        }
    }
}

fn technology_for(file_name: &str) -> Option<(&'static str, &'static [&'static str])> {
    let (_, extension) = file_name.rsplit_once('.')?;
    match extension {
        "py" => Some(("Python", PYTHON_ENTRY_POINTS)),
        "js" => Some(("JavaScript", JS_ENTRY_POINTS)),
        "html" => Some(("HTML", &[])),
        "css" => Some(("CSS", &[])),
        "java" => Some(("Java", JAVA_ENTRY_POINTS)),
        "cpp" | "cc" => Some(("C++", CPP_ENTRY_POINTS)),
        "h" => Some(("C++", &[])),
        _ => None,
    }
}

/// `path` relative to `root`, joined with `/` on every platform
pub(crate) fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
