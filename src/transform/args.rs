//! `args` section

use super::{RuleContext, SectionRule};
use crate::document::spec::{ARG_COMMIT, ARG_REVISION, ARG_TARGETARCH, ARG_TARGETOS, ARG_VERSION};
use crate::document::{DocMap, DocValue};

const DEFAULT_REVISION: &str = "1";
const DEFAULT_VERSION: &str = "0.1";

pub struct ArgsRule;

impl SectionRule for ArgsRule {
    fn section(&self) -> &'static str {
        "args"
    }

    fn requires_stages(&self) -> bool {
        false
    }

    fn apply(&self, ctx: &RuleContext<'_>) -> DocValue {
        let declared = |key: &str, default: &str| {
            ctx.model.global_arg(key).unwrap_or(default).to_string()
        };

        // Fetched commit beats a placeholder ARG COMMIT in the build file
        let commit = ctx
            .repo_field(|repo| repo.commit.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| declared(ARG_COMMIT, ""));

        let mut args = DocMap::new();
        args.insert(ARG_REVISION, declared(ARG_REVISION, DEFAULT_REVISION));
        args.insert(ARG_VERSION, declared(ARG_VERSION, DEFAULT_VERSION));
        args.insert(ARG_COMMIT, commit);
        args.insert(ARG_TARGETARCH, declared(ARG_TARGETARCH, ""));
        args.insert(ARG_TARGETOS, declared(ARG_TARGETOS, ""));

        DocValue::Map(args)
    }
}
