//! `name` section and package name derivation

use super::{RepoMetadata, RuleContext, SectionRule};
use crate::classify;
use crate::document::DocValue;
use crate::model::BuildModel;
use std::path::Path;

const FALLBACK_NAME: &str = "package";

/// Stage names that say nothing about what is shipped
const GENERIC_STAGE_NAMES: &[&str] = &["builder", "build", "linux", "windows"];

pub struct NameRule;

impl SectionRule for NameRule {
    fn section(&self) -> &'static str {
        "name"
    }

    fn requires_stages(&self) -> bool {
        false
    }

    fn apply(&self, ctx: &RuleContext<'_>) -> DocValue {
        DocValue::from(ctx.package_name.clone())
    }
}

/// Repository name, then the last meaningful stage name, then the name of a
/// binary copied out of the builder stage, then a generic fallback.
/// The result is always lower-case.
pub fn derive_package_name(model: &BuildModel, repo: Option<&RepoMetadata>) -> String {
    if let Some(name) = repo.map(|r| r.repo_name.as_str()).filter(|n| !n.is_empty()) {
        return name.to_lowercase();
    }

    let stage_name = model.stages.iter().rev().find_map(|stage| {
        let name = stage.name.to_lowercase();
        (!name.is_empty() && !GENERIC_STAGE_NAMES.contains(&name.as_str())).then_some(name)
    });
    if let Some(name) = stage_name {
        return name;
    }

    let builder_name = classify::builder_stage_name(&model.stages);
    model
        .stages
        .iter()
        .rev()
        .flat_map(|stage| &stage.copy_instructions)
        .filter(|copy| classify::is_builder_reference(&copy.from_stage, builder_name))
        .flat_map(|copy| &copy.sources)
        .filter(|src| src.contains("/bin/"))
        .find_map(|src| binary_name(src))
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

fn binary_name(path: &str) -> Option<String> {
    let file = Path::new(path).file_name()?.to_str()?.to_lowercase();
    let name = file.strip_suffix(".exe").unwrap_or(&file);
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CopyInstruction, CopyKind, Stage};

    fn stage(name: &str) -> Stage {
        Stage {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn copy_from_builder(src: &str) -> CopyInstruction {
        CopyInstruction {
            kind: CopyKind::Copy,
            from_stage: "builder".to_string(),
            sources: vec![src.to_string()],
            dest: "C:/app/".to_string(),
        }
    }

    #[test]
    fn test_repository_name_wins() {
        let model = BuildModel {
            stages: vec![stage("helloworld")],
            ..Default::default()
        };
        let repo = RepoMetadata {
            repo_name: "HelloWorld-Service".to_string(),
            ..Default::default()
        };

        assert_eq!(derive_package_name(&model, Some(&repo)), "helloworld-service");
    }

    #[test]
    fn test_meaningful_stage_name() {
        let model = BuildModel {
            stages: vec![stage("builder"), stage("HelloWorld"), stage("windows")],
            ..Default::default()
        };

        assert_eq!(derive_package_name(&model, None), "helloworld");
    }

    #[test]
    fn test_binary_name_from_builder_copy() {
        let mut final_stage = stage("");
        final_stage.copy_instructions = vec![copy_from_builder("/app/bin/Widget.exe")];
        let model = BuildModel {
            stages: vec![stage("builder"), final_stage],
            ..Default::default()
        };

        assert_eq!(derive_package_name(&model, None), "widget");
    }

    #[test]
    fn test_fallback() {
        assert_eq!(derive_package_name(&BuildModel::default(), None), "package");

        let model = BuildModel {
            stages: vec![stage("build"), stage("")],
            ..Default::default()
        };
        assert_eq!(derive_package_name(&model, None), "package");
    }
}
