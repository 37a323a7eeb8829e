//! `dependencies` section

use super::{marker, RuleContext, SectionRule};
use crate::document::{DocMap, DocValue};

pub struct DependenciesRule;

impl SectionRule for DependenciesRule {
    fn section(&self) -> &'static str {
        "dependencies"
    }

    fn apply(&self, ctx: &RuleContext<'_>) -> DocValue {
        let toolchain = ctx.toolchain;
        let needs_toolchain = ctx.any_stage_uses_toolchain()
            || ctx
                .stages()
                .iter()
                .any(|stage| toolchain.matches_base_image(&stage.base_ref));

        let mut dependencies = DocMap::new();
        if needs_toolchain {
            let mut build = DocMap::new();
            build.insert(toolchain.build_dependency(), marker());
            dependencies.insert("build", build);
        }

        DocValue::Map(dependencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BuildModel, Stage};
    use crate::toolchain::GoToolchain;

    fn apply(stages: Vec<Stage>) -> DocValue {
        let model = BuildModel {
            stages,
            ..Default::default()
        };
        DependenciesRule.apply(&RuleContext::new(&model, None, &GoToolchain))
    }

    #[test]
    fn test_go_invocation_adds_build_dependency() {
        let deps = apply(vec![Stage {
            name: "builder".to_string(),
            base_ref: "ubuntu:22.04".to_string(),
            run_commands: vec!["go build ./...".to_string()],
            ..Default::default()
        }]);

        assert_eq!(deps.pointer("build.msft-golang"), Some(&DocValue::empty_map()));
    }

    #[test]
    fn test_go_base_image_adds_build_dependency() {
        let deps = apply(vec![Stage {
            name: "builder".to_string(),
            base_ref: "golang:1.22".to_string(),
            run_commands: vec!["make".to_string()],
            ..Default::default()
        }]);

        assert!(deps.pointer("build.msft-golang").is_some());
    }

    #[test]
    fn test_no_toolchain_leaves_section_empty() {
        let deps = apply(vec![Stage {
            base_ref: "alpine".to_string(),
            run_commands: vec!["apk add curl".to_string()],
            ..Default::default()
        }]);

        assert!(deps.is_empty());
    }
}
