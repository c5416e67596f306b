//! Project description produced by the classifier

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// License value used when no license file is found
pub const LICENSE_UNSPECIFIED: &str = "unspecified";

/// Description used when no manifest provides one
pub const DEFAULT_DESCRIPTION: &str = "Automatically generated project.";

/// Number of dependencies rendered in README and prompts
pub const RENDERED_DEPENDENCY_LIMIT: usize = 10;

/// Heuristic application type of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectType {
    #[serde(rename = "Python")]
    Python,
    #[serde(rename = "JavaScript/Node.js")]
    Node,
    #[serde(rename = "Electron Desktop App")]
    Electron,
    #[serde(rename = "React Web App")]
    React,
    #[serde(rename = "Angular Web App")]
    Angular,
    #[serde(rename = "Vue.js Web App")]
    Vue,
    #[serde(rename = "C# (.NET)")]
    DotNet,
    #[serde(rename = "Java")]
    Java,
    #[serde(rename = "C++")]
    Cpp,
    #[serde(rename = "HTML/CSS/JS")]
    StaticWeb,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl ProjectType {
    pub fn name(&self) -> &'static str {
        match self {
            ProjectType::Python => "Python",
            ProjectType::Node => "JavaScript/Node.js",
            ProjectType::Electron => "Electron Desktop App",
            ProjectType::React => "React Web App",
            ProjectType::Angular => "Angular Web App",
            ProjectType::Vue => "Vue.js Web App",
            ProjectType::DotNet => "C# (.NET)",
            ProjectType::Java => "Java",
            ProjectType::Cpp => "C++",
            ProjectType::StaticWeb => "HTML/CSS/JS",
            ProjectType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operating system a project targets
///
/// Ordering is the canonical display order (Windows, macOS, Linux).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "Windows")]
    Windows,
    #[serde(rename = "macOS")]
    MacOs,
    #[serde(rename = "Linux")]
    Linux,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Windows, Platform::MacOs, Platform::Linux];

    pub fn name(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::MacOs => "macOS",
            Platform::Linux => "Linux",
        }
    }

    /// Platform implied by an installer or package file name
    pub fn from_installer_name(file_name: &str) -> Option<Self> {
        if file_name.ends_with(".exe") || file_name.ends_with(".msi") {
            Some(Platform::Windows)
        } else if file_name.ends_with(".app") {
            Some(Platform::MacOs)
        } else if file_name.ends_with(".deb")
            || file_name.ends_with(".rpm")
            || file_name.ends_with(".sh")
        {
            Some(Platform::Linux)
        } else {
            None
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Heuristic description of a project directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    /// Never empty once classification completes
    pub target_platforms: BTreeSet<Platform>,
    pub description: String,
    /// Relative paths with `/` separators, in walk order
    pub main_files: Vec<String>,
    pub dependencies: Vec<String>,
    pub technologies: BTreeSet<String>,
    pub entry_point: Option<String>,
    pub has_tests: bool,
    pub license: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_readme: Option<String>,
}

impl ProjectDescription {
    /// Empty description for `name`, before any detection ran
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            project_type: ProjectType::Unknown,
            target_platforms: BTreeSet::new(),
            description: DEFAULT_DESCRIPTION.to_string(),
            main_files: Vec::new(),
            dependencies: Vec::new(),
            technologies: BTreeSet::new(),
            entry_point: None,
            has_tests: false,
            license: LICENSE_UNSPECIFIED.to_string(),
            existing_readme: None,
        }
    }

    pub fn has_technology(&self, technology: &str) -> bool {
        self.technologies.contains(technology)
    }

    pub fn is_windows_only(&self) -> bool {
        self.target_platforms.len() == 1 && self.target_platforms.contains(&Platform::Windows)
    }

    pub fn has_license(&self) -> bool {
        self.license != LICENSE_UNSPECIFIED
    }

    /// First dependencies shown to readers, and whether the list was cut
    pub fn rendered_dependencies(&self) -> (&[String], bool) {
        let shown = self.dependencies.len().min(RENDERED_DEPENDENCY_LIMIT);
        (
            &self.dependencies[..shown],
            self.dependencies.len() > RENDERED_DEPENDENCY_LIMIT,
        )
    }

    pub fn platform_names(&self) -> Vec<&'static str> {
        self.target_platforms.iter().map(Platform::name).collect()
    }
}
