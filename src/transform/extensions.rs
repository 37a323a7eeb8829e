//! `x-build-extensions` section

use super::{RuleContext, SectionRule};
use crate::document::{DocMap, DocValue};

const REPOSITORY: &str = "azure";
const BUILD_TARGETS: &[&str] = &["azlinux3/rpm", "azlinux3/container", "windowscross/container"];
const WINDOWS_PLATFORMS: &[&str] = &["windows/amd64"];

pub struct ExtensionsRule;

impl SectionRule for ExtensionsRule {
    fn section(&self) -> &'static str {
        "x-build-extensions"
    }

    fn requires_stages(&self) -> bool {
        false
    }

    fn apply(&self, ctx: &RuleContext<'_>) -> DocValue {
        let mut windowscross = DocMap::new();
        windowscross.insert("platforms", string_list(WINDOWS_PLATFORMS));

        let mut per_target = DocMap::new();
        per_target.insert("windowscross", windowscross);

        let mut ext = DocMap::new();
        ext.insert("image-name", ctx.package_name.to_lowercase());
        ext.insert("repository", REPOSITORY);
        ext.insert("build-targets", string_list(BUILD_TARGETS));
        ext.insert("per-target", per_target);

        DocValue::Map(ext)
    }
}

fn string_list(items: &[&str]) -> DocValue {
    DocValue::List(items.iter().map(|item| DocValue::from(*item)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BuildModel;
    use crate::toolchain::GoToolchain;

    #[test]
    fn test_extensions_use_package_name() {
        let model = BuildModel::default();
        let ctx = RuleContext::new(&model, None, &GoToolchain);
        let ext = ExtensionsRule.apply(&ctx);

        assert_eq!(ext.pointer("image-name").and_then(DocValue::as_str), Some("package"));
        assert_eq!(ext.pointer("repository").and_then(DocValue::as_str), Some("azure"));
        assert_eq!(ext.pointer("build-targets").and_then(DocValue::as_list).map(<[_]>::len), Some(3));
        assert_eq!(
            ext.pointer("per-target.windowscross.platforms"),
            Some(&DocValue::List(vec![DocValue::from("windows/amd64")]))
        );
    }
}
