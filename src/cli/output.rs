//! Output formatting
//!
//! The spec itself is rendered as YAML or JSON. The human summary goes to
//! stderr after the spec has been written.

use crate::document::{self, SpecDocument};
use crate::generator::GenerationReport;
use anyhow::Result;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Sections reported as auto-populated when non-empty
const SUMMARY_SECTIONS: &[&str] = &["sources", "dependencies", "targets", "build", "artifacts", "image"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// YAML with the leading `# syntax=` directive
    Yaml,
    /// Pretty-printed JSON, no directive
    Json,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_document(&self, doc: &SpecDocument) -> Result<String> {
        match self.format {
            OutputFormat::Yaml => document::to_yaml(doc),
            OutputFormat::Json => document::to_json(doc),
        }
    }

    /// Which fields were filled in and which still need a human
    pub fn format_summary(&self, report: &GenerationReport) -> String {
        let doc = &report.document;
        let mut output = String::new();

        if report.needs_manual_input() {
            output.push_str("\u{26A0} Dalec spec generated (manual input needed)\n");
        } else {
            output.push_str("\u{2713} Dalec spec generated\n");
        }
        output.push_str(RULE);
        output.push_str("\n\n");

        output.push_str(&format!("Name:      {}\n", doc.name()));
        output.push_str(&format!("Revision:  {}\n", doc.revision_arg()));
        output.push_str(&format!("Stages:    {}\n", report.model.stages.len()));
        if let Some(reconciliation) = &report.reconciliation {
            output.push_str(&format!("Previous:  {}\n", reconciliation));
        }
        output.push('\n');

        let populated: Vec<&str> = SUMMARY_SECTIONS
            .iter()
            .copied()
            .filter(|section| !doc.section(section).is_empty())
            .collect();
        output.push_str("Auto-populated:\n");
        push_tree(&mut output, populated.iter().map(|s| s.to_string()).collect(), "(none)");

        output.push_str("\nNeeds manual input:\n");
        push_tree(
            &mut output,
            report.manual_fields.iter().map(ToString::to_string).collect(),
            "(none)",
        );

        if !report.model.warnings.is_empty() {
            output.push_str("\nBuild file warnings:\n");
            push_tree(
                &mut output,
                report.model.warnings.iter().map(ToString::to_string).collect(),
                "(none)",
            );
        }

        output
    }
}

fn push_tree(output: &mut String, items: Vec<String>, empty: &str) {
    if items.is_empty() {
        output.push_str(&format!("\u{2514}\u{2500} {}\n", empty));
        return;
    }
    let last = items.len() - 1;
    for (i, item) in items.iter().enumerate() {
        let connector = if i == last { "\u{2514}" } else { "\u{251C}" };
        output.push_str(&format!("{}\u{2500} {}\n", connector, item));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::ManualField;
    use crate::model::BuildModel;
    use crate::transform::Transformer;

    fn report(manual_fields: Vec<ManualField>) -> GenerationReport {
        let model = BuildModel::default();
        GenerationReport {
            document: Transformer::default().transform(&model, None),
            model,
            reconciliation: None,
            manual_fields,
        }
    }

    #[test]
    fn test_yaml_starts_with_directive() {
        let report = report(vec![]);
        let yaml = OutputFormatter::new(OutputFormat::Yaml)
            .format_document(&report.document)
            .unwrap();
        assert!(yaml.starts_with("# syntax=ghcr.io/azure/dalec/frontend:latest\n"));
    }

    #[test]
    fn test_json_has_no_directive() {
        let report = report(vec![]);
        let json = OutputFormatter::new(OutputFormat::Json)
            .format_document(&report.document)
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["name"], "package");
        assert!(!json.contains("syntax="));
    }

    #[test]
    fn test_summary_lists_manual_fields() {
        let summary = OutputFormatter::new(OutputFormat::Yaml)
            .format_summary(&report(vec![ManualField::License, ManualField::Commit]));

        assert!(summary.contains("manual input needed"));
        assert!(summary.contains("\u{251C}\u{2500} license"));
        assert!(summary.contains("\u{2514}\u{2500} args.COMMIT"));
        assert!(summary.contains("Auto-populated:\n\u{2514}\u{2500} (none)"));
    }

    #[test]
    fn test_summary_without_manual_fields() {
        let summary = OutputFormatter::new(OutputFormat::Yaml).format_summary(&report(vec![]));
        assert!(summary.starts_with("\u{2713} Dalec spec generated"));
        assert!(summary.contains("Needs manual input:\n\u{2514}\u{2500} (none)"));
    }
}
