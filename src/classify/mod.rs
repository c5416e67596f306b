//! Heuristic project classification
//!
//! Inspects a project directory and infers what kind of application it holds:
//! the project type, the platforms it targets, its dependencies, its entry point
//! and a handful of auxiliary facts (license, tests, existing README).
//!
//! Classification is best-effort. Unreadable files are logged through the
//! progress handler and skipped; [`ProjectClassifier::classify`] never fails.
//!
//! # Detection order
//!
//! Manifests are checked in a fixed priority order and the first match decides
//! the project type:
//!
//! 1. `*.csproj` at the root (C#/.NET, Windows only)
//! 2. `package.json` (Node.js, refined to Electron/React/Angular/Vue)
//! 3. `requirements.txt` (Python)
//! 4. `pom.xml` (Java)
//! 5. `CMakeLists.txt` (C++)
//! 6. `index.html` / `main.html` (static web)
//!
//! A recursive walk then collects source files, technologies, the entry point
//! and installer-derived platforms.

mod classifier;
mod manifests;
mod scan;
mod types;

pub use classifier::{classify, ProjectClassifier};
pub use types::{
    Platform, ProjectDescription, ProjectType, DEFAULT_DESCRIPTION, LICENSE_UNSPECIFIED,
    RENDERED_DEPENDENCY_LIMIT,
};
