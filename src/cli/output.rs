//! Output formatting for multiple formats
//!
//! `classify` and `check` print through [`OutputFormatter`] as JSON, YAML or
//! human-readable text.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write;

use crate::classify::ProjectDescription;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Availability of one external tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolStatus {
    pub name: String,
    pub path: Option<String>,
    pub purpose: String,
}

impl ToolStatus {
    pub fn available(&self) -> bool {
        self.path.is_some()
    }
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_description(&self, desc: &ProjectDescription) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(desc)
                .context("Failed to serialize project description to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(desc)
                .context("Failed to serialize project description to YAML"),
            OutputFormat::Human => Ok(self.format_description_human(desc)),
        }
    }

    pub fn format_tools(&self, tools: &[ToolStatus]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(tools).context("Failed to serialize tools to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(tools).context("Failed to serialize tools to YAML")
            }
            OutputFormat::Human => Ok(self.format_tools_human(tools)),
        }
    }

    fn format_description_human(&self, desc: &ProjectDescription) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "Project:      {}", desc.name);
        let _ = writeln!(output, "Type:         {}", desc.project_type);
        let _ = writeln!(output, "Platforms:    {}", desc.platform_names().join(", "));
        let _ = writeln!(output, "Description:  {}", desc.description);
        let _ = writeln!(
            output,
            "Entry point:  {}",
            desc.entry_point.as_deref().unwrap_or("(not found)")
        );
        let _ = writeln!(output, "License:      {}", desc.license);
        let _ = writeln!(output, "Tests:        {}", if desc.has_tests { "yes" } else { "no" });
        let _ = writeln!(
            output,
            "README:       {}",
            if desc.existing_readme.is_some() { "present" } else { "missing" }
        );

        if !desc.technologies.is_empty() {
            output.push_str("\nTechnologies:\n");
            for tech in &desc.technologies {
                let _ = writeln!(output, "  \u{2022} {}", tech);
            }
        }

        if !desc.dependencies.is_empty() {
            let _ = writeln!(output, "\nDependencies ({}):", desc.dependencies.len());
            for dep in &desc.dependencies {
                let _ = writeln!(output, "  \u{2022} {}", dep);
            }
        }

        if !desc.main_files.is_empty() {
            let _ = writeln!(output, "\nSource files ({}):", desc.main_files.len());
            for file in &desc.main_files {
                let _ = writeln!(output, "  {}", file);
            }
        }

        output
    }

    fn format_tools_human(&self, tools: &[ToolStatus]) -> String {
        let mut output = String::new();
        for tool in tools {
            match &tool.path {
                Some(path) => {
                    let _ = writeln!(output, "\u{2713} {:<4} {} ({})", tool.name, path, tool.purpose);
                }
                None => {
                    let _ = writeln!(output, "\u{2717} {:<4} not found ({})", tool.name, tool.purpose);
                }
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Platform, ProjectType};

    fn sample() -> ProjectDescription {
        let mut desc = ProjectDescription::new("weather");
        desc.project_type = ProjectType::Python;
        desc.target_platforms.extend(Platform::ALL);
        desc.technologies.insert("Python".to_string());
        desc.dependencies = vec!["flask==2.0".to_string()];
        desc.entry_point = Some("main.py".to_string());
        desc
    }

    #[test]
    fn test_json_uses_display_names() {
        let output = OutputFormatter::new(OutputFormat::Json)
            .format_description(&sample())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["type"], "Python");
        assert_eq!(value["target_platforms"][1], "macOS");
        assert_eq!(value["entry_point"], "main.py");
    }

    #[test]
    fn test_yaml_output() {
        let output = OutputFormatter::new(OutputFormat::Yaml)
            .format_description(&sample())
            .unwrap();

        assert!(output.contains("name: weather"));
        assert!(output.contains("- flask==2.0"));
    }

    #[test]
    fn test_human_output() {
        let output = OutputFormatter::new(OutputFormat::Human)
            .format_description(&sample())
            .unwrap();

        assert!(output.contains("Type:         Python"));
        assert!(output.contains("Platforms:    Windows, macOS, Linux"));
        assert!(output.contains("Entry point:  main.py"));
    }

    #[test]
    fn test_tools_human() {
        let tools = vec![
            ToolStatus {
                name: "git".to_string(),
                path: Some("/usr/bin/git".to_string()),
                purpose: "commits and pushes".to_string(),
            },
            ToolStatus {
                name: "gh".to_string(),
                path: None,
                purpose: "repositories and releases".to_string(),
            },
        ];

        let output = OutputFormatter::new(OutputFormat::Human)
            .format_tools(&tools)
            .unwrap();

        assert!(output.contains("\u{2713} git  /usr/bin/git"));
        assert!(output.contains("\u{2717} gh   not found"));
        assert!(!tools[1].available());
    }
}
