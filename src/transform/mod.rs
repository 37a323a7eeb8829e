//! Build model to specification transformation
//!
//! Each section of the output is produced by an independent [`SectionRule`].
//! Rules only read the shared [`RuleContext`]; none of them sees another
//! rule's output, so they can be reordered or tested in isolation.

pub mod args;
pub mod artifacts;
pub mod build;
pub mod context;
pub mod dependencies;
pub mod extensions;
pub mod image;
pub mod metadata;
pub mod name;
pub mod sources;
pub mod targets;

pub use context::{RepoMetadata, RuleContext};
pub use name::derive_package_name;

use crate::document::{DocValue, SpecDocument, DEFAULT_FRONTEND};
use crate::model::BuildModel;
use crate::toolchain::{default_toolchain, Toolchain};
use tracing::debug;

pub const DEFAULT_PACKAGER: &str = "Azure Container Upstream";
pub const DEFAULT_VENDOR: &str = "Microsoft Corporation";

/// One section of the generated specification
pub trait SectionRule: Send + Sync {
    /// Top-level key the rule writes
    fn section(&self) -> &'static str;

    /// Whether the section stays empty for a model without stages
    fn requires_stages(&self) -> bool {
        true
    }

    fn apply(&self, ctx: &RuleContext<'_>) -> DocValue;
}

/// Fixed document values that are not derived from the build file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    pub frontend: String,
    pub packager: String,
    pub vendor: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            frontend: DEFAULT_FRONTEND.to_string(),
            packager: DEFAULT_PACKAGER.to_string(),
            vendor: DEFAULT_VENDOR.to_string(),
        }
    }
}

pub struct Transformer {
    rules: Vec<Box<dyn SectionRule>>,
    options: TransformOptions,
    toolchain: &'static dyn Toolchain,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new(TransformOptions::default())
    }
}

impl Transformer {
    pub fn new(options: TransformOptions) -> Self {
        Self {
            rules: default_rules(),
            options,
            toolchain: default_toolchain(),
        }
    }

    /// Produce a specification document. Pure: the same model and metadata
    /// always give the same document.
    pub fn transform(&self, model: &BuildModel, repo: Option<&RepoMetadata>) -> SpecDocument {
        let ctx = RuleContext::new(model, repo, self.toolchain);
        debug!(
            toolchain = self.toolchain.id(),
            builder = ctx.builder_name,
            package = %ctx.package_name,
            "Transforming build model"
        );
        let mut doc = SpecDocument::new(&self.options.frontend);

        for rule in &self.rules {
            let value = if rule.requires_stages() && model.is_empty() {
                DocValue::empty_map()
            } else {
                rule.apply(&ctx)
            };
            debug!(section = rule.section(), empty = value.is_empty(), "Section generated");
            doc.set(rule.section(), value);
        }

        metadata::populate(&mut doc, &ctx, &self.options);
        doc.set("tests", DocValue::empty_list());
        doc.normalize_order();

        doc
    }
}

fn default_rules() -> Vec<Box<dyn SectionRule>> {
    vec![
        Box::new(args::ArgsRule),
        Box::new(name::NameRule),
        Box::new(extensions::ExtensionsRule),
        Box::new(sources::SourcesRule),
        Box::new(dependencies::DependenciesRule),
        Box::new(targets::TargetsRule),
        Box::new(build::BuildRule),
        Box::new(artifacts::ArtifactsRule),
        Box::new(image::ImageRule),
    ]
}

/// `{}` marker used for set-like mappings (dependencies, binaries)
pub(crate) fn marker() -> DocValue {
    DocValue::empty_map()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SECTION_ORDER;

    #[test]
    fn test_empty_model_has_every_section() {
        let doc = Transformer::default().transform(&BuildModel::default(), None);

        assert_eq!(doc.root.keys().collect::<Vec<_>>(), SECTION_ORDER.to_vec());
        for section in ["sources", "dependencies", "targets", "build", "artifacts", "image"] {
            assert!(doc.section(section).is_empty(), "{} should be empty", section);
        }
        assert_eq!(doc.name(), "package");
        assert_eq!(doc.revision_arg(), "1");
        assert_eq!(doc.get("tests"), Some(&DocValue::empty_list()));
    }

    #[test]
    fn test_custom_options() {
        let options = TransformOptions {
            frontend: "example.com/frontend:2".to_string(),
            packager: "Packager".to_string(),
            vendor: "Vendor".to_string(),
        };
        let doc = Transformer::new(options).transform(&BuildModel::default(), None);

        assert_eq!(doc.syntax.as_deref(), Some("example.com/frontend:2"));
        assert_eq!(doc.get("packager").and_then(DocValue::as_str), Some("Packager"));
        assert_eq!(doc.get("vendor").and_then(DocValue::as_str), Some("Vendor"));
    }
}
