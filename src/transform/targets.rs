//! `targets` section

use super::{marker, RuleContext, SectionRule};
use crate::document::{DocMap, DocValue};

pub struct TargetsRule;

impl SectionRule for TargetsRule {
    fn section(&self) -> &'static str {
        "targets"
    }

    fn apply(&self, ctx: &RuleContext<'_>) -> DocValue {
        let mut targets = DocMap::new();

        // Only an actual invocation pulls in runtime libraries; a toolchain
        // base image alone does not.
        if ctx.any_stage_uses_toolchain() {
            let runtime: DocMap = ctx
                .toolchain
                .runtime_dependencies()
                .iter()
                .map(|dep| (*dep, marker()))
                .collect();

            let mut dependencies = DocMap::new();
            dependencies.insert("runtime", runtime);

            let mut target = DocMap::new();
            target.insert("dependencies", dependencies);
            targets.insert(ctx.toolchain.runtime_target(), target);
        }

        DocValue::Map(targets)
    }
}
