//! Deterministic README rendering

use crate::classify::{ProjectDescription, ProjectType};
use std::fmt::Write;

/// Heading of the overview section; the screenshot section is inserted after it
pub const OVERVIEW_HEADING: &str = "## 📌 Overview";

const PREREQUISITES: &str = "Make sure the [GitHub CLI](https://cli.github.com/) is installed \
and that you are signed in.\n\n\
Creating releases may need extra permissions. Grant them with:\n\
```bash\n\
gh auth refresh -h github.com -s workflow\n\
```\n\n";

/// Renders a README from the description alone
///
/// The existing README, if any, is deliberately not consulted.
pub fn render_readme(desc: &ProjectDescription) -> String {
    let mut out = String::new();

    let _ = write!(out, "# {}\n\n{}\n\n", desc.name, desc.description);
    let _ = write!(out, "{}\n\n{}\n\n", OVERVIEW_HEADING, desc.description);

    write_features(&mut out, desc);
    write_technologies(&mut out, desc);
    write_dependencies(&mut out, desc);

    out.push_str("## ⚙️ Prerequisites\n\n");
    out.push_str(PREREQUISITES);

    write_installation(&mut out, desc);
    write_usage(&mut out, desc);

    if desc.has_license() {
        let _ = write!(
            out,
            "## 📄 License\n\nThis project is licensed under {}.\n\n",
            desc.license
        );
    }

    out
}

fn write_features(out: &mut String, desc: &ProjectDescription) {
    out.push_str("## 🚀 Features\n\n");
    if desc.is_windows_only() {
        out.push_str("- Runs on Windows\n");
    } else if !desc.target_platforms.is_empty() {
        let _ = writeln!(out, "- Runs on {}", desc.platform_names().join(", "));
    }
    out.push_str("- Modern user interface\n");
    out.push_str("- Intuitive controls\n\n");
}

fn write_technologies(out: &mut String, desc: &ProjectDescription) {
    if desc.technologies.is_empty() {
        return;
    }
    out.push_str("## 🛠️ Technologies\n\n");
    for tech in &desc.technologies {
        let _ = writeln!(out, "- {}", tech);
    }
    out.push('\n');
}

fn write_dependencies(out: &mut String, desc: &ProjectDescription) {
    let (shown, truncated) = desc.rendered_dependencies();
    if shown.is_empty() {
        return;
    }
    out.push_str("## 📦 Dependencies\n\n");
    for dep in shown {
        let _ = writeln!(out, "- {}", dep);
    }
    if truncated {
        out.push_str("- ...\n");
    }
    out.push('\n');
}

fn write_installation(out: &mut String, desc: &ProjectDescription) {
    out.push_str("## 💾 Installation\n\n");
    let command = if desc.has_technology("Python") {
        Some("pip install -r requirements.txt")
    } else if desc.has_technology("Node.js") || desc.has_technology("JavaScript") {
        Some("npm install")
    } else if desc.has_technology("Java") {
        Some("mvn install")
    } else {
        None
    };

    match command {
        Some(command) => code_block(out, command),
        None => out.push_str("Follow the steps in the Usage section.\n\n"),
    }
}

fn write_usage(out: &mut String, desc: &ProjectDescription) {
    out.push_str("## ▶️ Usage\n\n");

    if let Some(entry) = &desc.entry_point {
        if desc.has_technology("Python") {
            code_block(out, &format!("python {}", entry));
        } else if desc.has_technology("JavaScript") {
            code_block(out, &format!("node {}", entry));
        } else if desc.has_technology("Java") {
            code_block(out, "javac *.java\njava Main");
        } else {
            let _ = write!(out, "Run the file: {}\n\n", entry);
        }
        return;
    }

    if desc.project_type == ProjectType::Electron {
        code_block(out, "npm start");
    } else if desc.has_technology("Python") {
        code_block(out, "python main.py");
    } else if desc.has_technology("Node.js") {
        code_block(out, "npm start");
    } else {
        out.push_str("Open the project and run it the way its type usually runs.\n\n");
    }
}

fn code_block(out: &mut String, body: &str) {
    let _ = write!(out, "```bash\n{}\n```\n\n", body);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Platform;

    fn python_project() -> ProjectDescription {
        let mut desc = ProjectDescription::new("weather");
        desc.project_type = ProjectType::Python;
        desc.target_platforms.extend(Platform::ALL);
        desc.technologies.insert("Python".to_string());
        desc.dependencies = vec!["flask==2.0".to_string()];
        desc.entry_point = Some("main.py".to_string());
        desc
    }

    #[test]
    fn test_sections_in_order() {
        let readme = render_readme(&python_project());

        let headings: Vec<&str> = readme.lines().filter(|l| l.starts_with('#')).collect();
        assert_eq!(
            headings,
            vec![
                "# weather",
                "## 📌 Overview",
                "## 🚀 Features",
                "## 🛠️ Technologies",
                "## 📦 Dependencies",
                "## ⚙️ Prerequisites",
                "## 💾 Installation",
                "## ▶️ Usage",
            ]
        );
        assert!(readme.contains("pip install -r requirements.txt"));
        assert!(readme.contains("python main.py"));
        assert!(readme.contains("gh auth refresh -h github.com -s workflow"));
        assert!(readme.contains("- Runs on Windows, macOS, Linux"));
    }

    #[test]
    fn test_windows_only_line() {
        let mut desc = ProjectDescription::new("tool");
        desc.target_platforms.insert(Platform::Windows);

        let readme = render_readme(&desc);

        assert!(readme.contains("- Runs on Windows\n"));
        assert!(!readme.contains("macOS"));
    }

    #[test]
    fn test_dependency_ellipsis() {
        let mut desc = python_project();
        desc.dependencies = (0..11).map(|i| format!("pkg{}", i)).collect();

        let readme = render_readme(&desc);

        assert!(readme.contains("- pkg9\n- ...\n"));
        assert!(!readme.contains("pkg10"));
    }

    #[test]
    fn test_license_only_when_known() {
        let mut desc = python_project();
        assert!(!render_readme(&desc).contains("## 📄 License"));

        desc.license = "MIT".to_string();
        assert!(render_readme(&desc).contains("licensed under MIT"));
    }

    #[test]
    fn test_existing_readme_not_embedded() {
        let mut desc = python_project();
        desc.existing_readme = Some("Legacy notes about the Ollama server".to_string());

        assert!(!render_readme(&desc).contains("Ollama"));
    }

    #[test]
    fn test_usage_fallbacks() {
        let mut desc = ProjectDescription::new("desk");
        desc.project_type = ProjectType::Electron;
        desc.technologies.insert("Node.js".to_string());
        assert!(render_readme(&desc).contains("npm start"));

        let mut java = ProjectDescription::new("app");
        java.technologies.insert("Java".to_string());
        java.entry_point = Some("src/Main.java".to_string());
        let readme = render_readme(&java);
        assert!(readme.contains("mvn install"));
        assert!(readme.contains("javac *.java\njava Main"));

        let mut cpp = ProjectDescription::new("engine");
        cpp.technologies.insert("C++".to_string());
        cpp.entry_point = Some("main.cpp".to_string());
        let readme = render_readme(&cpp);
        assert!(readme.contains("Follow the steps in the Usage section."));
        assert!(readme.contains("Run the file: main.cpp"));
    }
}
