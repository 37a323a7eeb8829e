//! Inputs shared by every section rule

use crate::classify;
use crate::model::{BuildModel, Stage};
use crate::toolchain::Toolchain;
use serde::Serialize;

/// Repository metadata supplied by the metadata source. Any field may be
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepoMetadata {
    pub git_url: String,
    pub commit: String,
    pub website: String,
    pub description: String,
    pub license: String,
    pub repo_name: String,
}

pub struct RuleContext<'a> {
    pub model: &'a BuildModel,
    pub repo: Option<&'a RepoMetadata>,
    pub toolchain: &'a dyn Toolchain,
    /// Resolved name of the compile stage
    pub builder_name: &'a str,
    /// Package name, derived once and shared by name-dependent sections
    pub package_name: String,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        model: &'a BuildModel,
        repo: Option<&'a RepoMetadata>,
        toolchain: &'a dyn Toolchain,
    ) -> Self {
        Self {
            model,
            repo,
            toolchain,
            builder_name: classify::builder_stage_name(&model.stages),
            package_name: super::name::derive_package_name(model, repo),
        }
    }

    pub fn stages(&self) -> &'a [Stage] {
        &self.model.stages
    }

    /// A metadata field, `None` when metadata is absent or the field is empty
    pub fn repo_field(&self, field: impl Fn(&RepoMetadata) -> &str) -> Option<&'a str> {
        self.repo.map(|repo| field(repo)).filter(|value| !value.is_empty())
    }

    pub fn any_stage_uses_toolchain(&self) -> bool {
        self.stages()
            .iter()
            .any(|stage| classify::uses_toolchain(stage, self.toolchain))
    }
}
