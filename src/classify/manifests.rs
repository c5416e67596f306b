//! Manifest detection, checked in priority order

use super::types::{Platform, ProjectDescription, ProjectType};
use crate::progress::ProgressHandler;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub(crate) const POM_DEPENDENCY_PLACEHOLDER: &str = "Dependencies are declared in pom.xml";

/// The manifest that decided a project's type
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Manifest {
    DotNet(PathBuf),
    PackageJson(PathBuf),
    Requirements(PathBuf),
    Pom(PathBuf),
    CMake(PathBuf),
    Html(PathBuf),
}

impl Manifest {
    /// First manifest found at `root`, in priority order
    pub(crate) fn detect(root: &Path, progress: &dyn ProgressHandler) -> Option<Self> {
        if let Some(csproj) = find_csproj(root, progress) {
            return Some(Manifest::DotNet(csproj));
        }

        let candidates: [(&str, fn(PathBuf) -> Manifest); 6] = [
            ("package.json", Manifest::PackageJson),
            ("requirements.txt", Manifest::Requirements),
            ("pom.xml", Manifest::Pom),
            ("CMakeLists.txt", Manifest::CMake),
            ("index.html", Manifest::Html),
            ("main.html", Manifest::Html),
        ];

        candidates.into_iter().find_map(|(file_name, build)| {
            let path = root.join(file_name);
            path.is_file().then(|| build(path))
        })
    }

    pub(crate) fn path(&self) -> &Path {
        match self {
            Manifest::DotNet(p)
            | Manifest::PackageJson(p)
            | Manifest::Requirements(p)
            | Manifest::Pom(p)
            | Manifest::CMake(p)
            | Manifest::Html(p) => p,
        }
    }

    /// Records what this manifest implies about the project
    pub(crate) fn apply(&self, desc: &mut ProjectDescription, progress: &dyn ProgressHandler) {
        progress.log(&format!("Found {}", file_label(self.path())));

        match self {
            Manifest::DotNet(path) => apply_dotnet(path, desc, progress),
            Manifest::PackageJson(path) => apply_package_json(path, desc, progress),
            Manifest::Requirements(path) => {
                set_type(desc, ProjectType::Python, &["Python"]);
                desc.target_platforms.extend(Platform::ALL);
                if let Some(content) = read_logged(path, progress) {
                    desc.dependencies = parse_requirements(&content);
                }
            }
            Manifest::Pom(path) => {
                set_type(desc, ProjectType::Java, &["Java"]);
                desc.target_platforms.extend(Platform::ALL);
                if let Some(content) = read_logged(path, progress) {
                    if content.contains("<dependencies>") {
                        desc.dependencies = vec![POM_DEPENDENCY_PLACEHOLDER.to_string()];
                    }
                }
            }
            Manifest::CMake(_) => {
                set_type(desc, ProjectType::Cpp, &["C++", "CMake"]);
                desc.target_platforms.extend(Platform::ALL);
            }
            Manifest::Html(_) => {
                set_type(desc, ProjectType::StaticWeb, &["HTML", "CSS", "JavaScript"]);
                desc.target_platforms.extend(Platform::ALL);
            }
        }
    }
}

fn set_type(desc: &mut ProjectDescription, project_type: ProjectType, technologies: &[&str]) {
    desc.project_type = project_type;
    desc.technologies.extend(technologies.iter().map(|t| t.to_string()));
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_logged(path: &Path, progress: &dyn ProgressHandler) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            progress.log(&format!("Failed to read {}: {}", path.display(), e));
            None
        }
    }
}

fn find_csproj(root: &Path, progress: &dyn ProgressHandler) -> Option<PathBuf> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            progress.log(&format!("Failed to list {}: {}", root.display(), e));
            return None;
        }
    };

    let mut projects: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .is_some_and(|n| n.to_string_lossy().ends_with(".csproj"))
        })
        .collect();
    projects.sort();
    projects.into_iter().next()
}

fn apply_dotnet(path: &Path, desc: &mut ProjectDescription, progress: &dyn ProgressHandler) {
    set_type(desc, ProjectType::DotNet, &["C#", ".NET"]);
    desc.target_platforms.clear();
    desc.target_platforms.insert(Platform::Windows);

    let Some(content) = read_logged(path, progress) else {
        return;
    };

    match extract_csproj_description(&content) {
        Ok(Some(description)) => desc.description = description,
        Ok(None) => {}
        Err(e) => progress.log(&format!("Failed to parse {}: {}", file_label(path), e)),
    }
}

/// Text of the first non-empty `<Description>` element
pub(crate) fn extract_csproj_description(
    content: &str,
) -> Result<Option<String>, roxmltree::Error> {
    let document = roxmltree::Document::parse(content)?;
    Ok(document
        .descendants()
        .filter(|node| node.has_tag_name("Description"))
        .filter_map(|node| node.text())
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string))
}

fn apply_package_json(path: &Path, desc: &mut ProjectDescription, progress: &dyn ProgressHandler) {
    set_type(desc, ProjectType::Node, &["JavaScript", "Node.js"]);

    let Some(content) = read_logged(path, progress) else {
        return;
    };
    let package: Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            progress.log(&format!("Failed to parse package.json: {}", e));
            return;
        }
    };

    if let Some(description) = package.get("description").and_then(Value::as_str) {
        desc.description = description.to_string();
    }

    for section in ["dependencies", "devDependencies"] {
        let Some(deps) = package.get(section).and_then(Value::as_object) else {
            continue;
        };
        desc.dependencies.extend(deps.keys().cloned());
        if let Some(marker) = framework_marker(deps) {
            progress.log(&format!("Detected {} from {}", marker, section));
            apply_marker(desc, marker);
        }
    }

    if let Some(scripts) = package.get("scripts").and_then(Value::as_object) {
        let electron_script = scripts.iter().find(|(_, body)| {
            body.as_str()
                .is_some_and(|command| command.contains("electron"))
        });
        if let Some((script_name, _)) = electron_script {
            progress.log(&format!(
                "Detected {} from script '{}'",
                ProjectType::Electron,
                script_name
            ));
            apply_marker(desc, ProjectType::Electron);
        }
    }
}

/// Framework implied by a dependency table; the desktop shell is checked first
pub(crate) fn framework_marker(deps: &Map<String, Value>) -> Option<ProjectType> {
    [
        ("electron", ProjectType::Electron),
        ("react", ProjectType::React),
        ("@angular/core", ProjectType::Angular),
        ("vue", ProjectType::Vue),
    ]
    .into_iter()
    .find(|(marker, _)| deps.contains_key(*marker))
    .map(|(_, project_type)| project_type)
}

/// Later markers overwrite earlier web subtypes, never the desktop type
fn apply_marker(desc: &mut ProjectDescription, marker: ProjectType) {
    if desc.project_type == ProjectType::Electron {
        return;
    }
    desc.project_type = marker;
    if marker == ProjectType::Electron {
        desc.target_platforms.extend(Platform::ALL);
    }
}

pub(crate) fn parse_requirements(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
