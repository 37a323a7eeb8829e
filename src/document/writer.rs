//! YAML and JSON rendering

use super::spec::SpecDocument;
use anyhow::{Context, Result};

/// Render as YAML: the syntax directive first, then one blank line between
/// top-level sections.
pub fn to_yaml(doc: &SpecDocument) -> Result<String> {
    let body =
        serde_yaml::to_string(&doc.root).context("Failed to serialize specification to YAML")?;

    let mut output = String::new();
    if let Some(frontend) = &doc.syntax {
        output.push_str(&format!("# syntax={}\n\n", frontend));
    }
    output.push_str(&space_sections(&body));

    Ok(output)
}

/// Render as pretty JSON. JSON has no comments, so the directive is dropped.
pub fn to_json(doc: &SpecDocument) -> Result<String> {
    serde_json::to_string_pretty(&doc.root).context("Failed to serialize specification to JSON")
}

fn space_sections(yaml: &str) -> String {
    let mut lines = Vec::new();

    for (i, line) in yaml.lines().enumerate() {
        let top_level = !line.is_empty() && !line.starts_with(' ') && !line.starts_with('-');
        if i > 0 && top_level {
            lines.push("");
        }
        lines.push(line);
    }

    let mut spaced = lines.join("\n");
    spaced.push('\n');
    spaced
}
