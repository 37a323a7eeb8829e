//! `sources` section

use super::{marker, RuleContext, SectionRule};
use crate::classify;
use crate::document::{DocMap, DocValue};
use crate::model::Stage;
use std::path::Path;

const FALLBACK_SOURCE_NAME: &str = "source";

pub struct SourcesRule;

impl SectionRule for SourcesRule {
    fn section(&self) -> &'static str {
        "sources"
    }

    fn apply(&self, ctx: &RuleContext<'_>) -> DocValue {
        let repo_name = ctx.repo_field(|repo| repo.repo_name.as_str());
        let mut sources = DocMap::new();

        match classify::builder_stages(ctx.stages()).next() {
            Some(stage) => {
                let name = repo_name
                    .map(str::to_string)
                    .or_else(|| source_name_from_workdir(stage))
                    .unwrap_or_else(|| FALLBACK_SOURCE_NAME.to_string());

                let mut source = DocMap::new();
                source.insert("git", git_source(ctx));
                if classify::uses_toolchain(stage, ctx.toolchain) {
                    let mut generator = DocMap::new();
                    generator.insert(ctx.toolchain.source_generator(), marker());
                    source.insert("generate", DocValue::List(vec![DocValue::Map(generator)]));
                }
                sources.insert(name, source);
            }
            None => {
                let mut source = DocMap::new();
                source.insert("git", git_source(ctx));
                sources.insert(repo_name.unwrap_or(FALLBACK_SOURCE_NAME), source);
            }
        }

        DocValue::Map(sources)
    }
}

fn git_source(ctx: &RuleContext<'_>) -> DocMap {
    let mut git = DocMap::new();
    git.insert(
        "url",
        ctx.repo_field(|repo| repo.git_url.as_str())
            .unwrap_or_default(),
    );
    git.insert("commit", "${COMMIT}");
    git
}

fn source_name_from_workdir(stage: &Stage) -> Option<String> {
    let name = Path::new(&stage.workdir).file_name()?.to_str()?;
    (!name.is_empty() && name != "." && name != "/").then(|| name.to_string())
}
