use super::manifests::Manifest;
use super::scan::TreeScan;
use super::types::{Platform, ProjectDescription};
use crate::progress::{LoggingHandler, ProgressHandler};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const README_FILE: &str = "README.md";
const LICENSE_FILES: &[&str] = &["LICENSE", "LICENSE.md", "LICENSE.txt", "COPYING", "COPYING.md"];
const TEST_DIRS: &[&str] = &["tests", "test", "__tests__"];

/// Classifies a project directory into a [`ProjectDescription`]
pub struct ProjectClassifier {
    root: PathBuf,
    name: String,
    progress: Arc<dyn ProgressHandler>,
}

impl ProjectClassifier {
    /// Classifier for `root`, naming the project after the folder
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = folder_name(&root);
        Self {
            root,
            name,
            progress: Arc::new(LoggingHandler),
        }
    }

    /// Overrides the project name (usually the target repository name)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Project name used in the description
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads the tree and builds the description; never fails
    pub fn classify(&self) -> ProjectDescription {
        let progress = self.progress.as_ref();
        let mut desc = ProjectDescription::new(self.name.clone());

        desc.existing_readme = self.read_existing_readme();
        desc.license = self.detect_license();
        desc.has_tests = TEST_DIRS.iter().any(|dir| self.root.join(dir).is_dir());

        match Manifest::detect(&self.root, progress) {
            Some(manifest) => manifest.apply(&mut desc, progress),
            None => progress.log("No project manifest found"),
        }

        if desc.target_platforms.is_empty() {
            progress.log("Target platforms undetermined, assuming Windows, macOS and Linux");
            desc.target_platforms.extend(Platform::ALL);
        }

        progress.log("Scanning project files...");
        let scan = TreeScan::run(&self.root, progress);
        desc.main_files = scan.main_files;
        desc.technologies.extend(scan.technologies);
        desc.entry_point = scan.entry_point;
        desc.target_platforms.extend(scan.platforms);

        progress.log(&format!(
            "Classification complete. Type: {}, platforms: {}",
            desc.project_type,
            desc.platform_names().join(", ")
        ));

        desc
    }

    fn read_existing_readme(&self) -> Option<String> {
        let path = self.root.join(README_FILE);
        if !path.is_file() {
            return None;
        }

        self.progress.log("Found an existing README.md, reading it");
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                self.progress
                    .log(&format!("Failed to read existing README.md: {}", e));
                None
            }
        }
    }

    fn detect_license(&self) -> String {
        let Some(&file_name) = LICENSE_FILES
            .iter()
            .find(|name| self.root.join(name).is_file())
        else {
            return super::LICENSE_UNSPECIFIED.to_string();
        };

        match fs::read_to_string(self.root.join(file_name)) {
            Ok(content) => license_name(&content).unwrap_or(file_name).to_string(),
            Err(e) => {
                self.progress
                    .log(&format!("Failed to read {}: {}", file_name, e));
                file_name.to_string()
            }
        }
    }
}

/// Classifies `root` with default settings
pub fn classify(root: &Path) -> ProjectDescription {
    ProjectClassifier::new(root).classify()
}

/// SPDX identifier of a well-known license text
fn license_name(content: &str) -> Option<&'static str> {
    let gpl = content.contains("GNU GENERAL PUBLIC LICENSE");
    if content.contains("MIT License")
        || content.contains("Permission is hereby granted, free of charge")
    {
        Some("MIT")
    } else if content.contains("Apache License") {
        Some("Apache-2.0")
    } else if gpl && content.contains("Version 3") {
        Some("GPL-3.0")
    } else if gpl && content.contains("Version 2") {
        Some("GPL-2.0")
    } else if content.contains("Mozilla Public License") {
        Some("MPL-2.0")
    } else if content.contains("Neither the name of") {
        Some("BSD-3-Clause")
    } else {
        None
    }
}

fn folder_name(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .as_deref()
        .unwrap_or(root)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string())
}
