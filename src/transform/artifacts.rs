//! `artifacts` section

use super::{marker, RuleContext, SectionRule};
use crate::classify;
use crate::document::{DocMap, DocValue};

pub struct ArtifactsRule;

impl SectionRule for ArtifactsRule {
    fn section(&self) -> &'static str {
        "artifacts"
    }

    fn apply(&self, ctx: &RuleContext<'_>) -> DocValue {
        let mut binaries = DocMap::new();

        let copies = ctx
            .stages()
            .iter()
            .rev()
            .filter(|stage| !classify::is_builder_stage(stage))
            .flat_map(|stage| &stage.copy_instructions)
            .filter(|copy| classify::is_builder_reference(&copy.from_stage, ctx.builder_name));

        for copy in copies {
            for src in copy.sources.iter().filter(|src| is_binary_path(src)) {
                binaries.insert(src, marker());
            }
        }

        let mut artifacts = DocMap::new();
        if !binaries.is_empty() {
            artifacts.insert("binaries", binaries);
        }
        DocValue::Map(artifacts)
    }
}

pub(crate) fn is_binary_path(path: &str) -> bool {
    path.contains("/bin/") || path.ends_with(".exe")
}
