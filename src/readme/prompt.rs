//! Prompts sent to the text generator

use crate::classify::ProjectDescription;
use serde::Serialize;

const README_INSTRUCTIONS: &str = "Write a structured README.md for the GitHub repository. \
Include a '## ⚙️ Prerequisites' section BEFORE the installation section; it must say that \
the user needs the GitHub CLI and has to run `gh auth refresh -h github.com -s workflow` \
so releases can be created. \
Use these sections, each starting with ##: \
1. Overview (2-3 sentences with emoji) \
2. Features (3-5 key features with emoji; do NOT list supported operating systems and do NOT say 'cross-platform') \
3. Technologies \
4. Dependencies (main ones, if any) \
5. Installation \
6. Running \
7. Usage (examples, if they can be inferred) \
8. Configuration (if applicable) \
9. Development (if the project has tests). \
Do not repeat the project name in the description. \
Use emoji to decorate the text. \
Write as an individual developer and avoid a corporate tone. \
Do not mention the license if it is unspecified.";

const WINDOWS_ONLY_INSTRUCTION: &str = " Do NOT mention macOS or Linux: the project runs on Windows only.";

/// Prompt asking the assistant for a complete README
///
/// An existing README is passed verbatim as the primary source. Without one the
/// prompt summarises type, technologies, dependencies and platforms.
pub fn readme_prompt(desc: &ProjectDescription) -> String {
    let mut prompt = format!(
        "Write an engaging description for the GitHub project named '{}'. ",
        desc.name
    );

    match &desc.existing_readme {
        Some(existing) => {
            prompt.push_str(
                "Use the following text from the existing README.md as the BASIS for the new one. \
                 Restructure and improve it, keeping every requirement it mentions \
                 (servers, external tools, specific dependencies). \
                 Existing README.md:\n\n'''\n",
            );
            prompt.push_str(existing);
            prompt.push_str("\n'''\n\n");
        }
        None => {
            prompt.push_str(&format!("Project type: {}. ", desc.project_type));
            if !desc.technologies.is_empty() {
                let techs: Vec<&str> = desc.technologies.iter().map(String::as_str).collect();
                prompt.push_str(&format!("Technologies: {}. ", techs.join(", ")));
            }
            let (deps, _) = desc.rendered_dependencies();
            if !deps.is_empty() {
                prompt.push_str(&format!("Main dependencies: {}. ", deps.join(", ")));
            }
        }
    }

    if desc.is_windows_only() {
        prompt.push_str("Target operating system: Windows. ");
    } else if !desc.target_platforms.is_empty() {
        prompt.push_str(&format!(
            "Target operating systems: {}. ",
            desc.platform_names().join(", ")
        ));
    }

    prompt.push_str(README_INSTRUCTIONS);
    if desc.is_windows_only() {
        prompt.push_str(WINDOWS_ONLY_INSTRUCTION);
    }
    prompt
}

#[derive(Serialize)]
struct ReleaseContext<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    project_type: String,
    description: &'a str,
    technologies: Vec<&'a str>,
    dependencies: &'a [String],
    platforms: Vec<&'static str>,
    entry_point: Option<&'a str>,
    has_tests: bool,
}

/// Prompt asking for `{"tag", "title", "notes"}` as JSON
pub fn release_notes_prompt(desc: &ProjectDescription) -> String {
    let context = ReleaseContext {
        name: &desc.name,
        project_type: desc.project_type.to_string(),
        description: &desc.description,
        technologies: desc.technologies.iter().map(String::as_str).collect(),
        dependencies: desc.rendered_dependencies().0,
        platforms: desc.platform_names(),
        entry_point: desc.entry_point.as_deref(),
        has_tests: desc.has_tests,
    };
    let project_json = serde_json::to_string_pretty(&context).unwrap_or_default();

    format!(
        "Draft the first release of this project.\n\nProject:\n{}\n\n\
         Answer with a JSON object with exactly these keys:\n\
         - \"tag\": a semantic version tag such as \"v1.0.0\"\n\
         - \"title\": a short release title\n\
         - \"notes\": Markdown release notes starting with \"## What's new\"\n",
        project_json
    )
}
