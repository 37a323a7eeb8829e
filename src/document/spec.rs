//! The generated specification document

use super::value::{DocMap, DocValue};
use serde::Serialize;

/// Frontend image referenced by the leading `# syntax=` directive
pub const DEFAULT_FRONTEND: &str = "ghcr.io/azure/dalec/frontend:latest";

/// Top-level keys in the order they are emitted
pub const SECTION_ORDER: &[&str] = &[
    "args",
    "name",
    "packager",
    "vendor",
    "license",
    "website",
    "description",
    "version",
    "revision",
    "x-build-extensions",
    "sources",
    "dependencies",
    "targets",
    "build",
    "artifacts",
    "image",
    "tests",
];

pub const ARG_REVISION: &str = "REVISION";
pub const ARG_VERSION: &str = "VERSION";
pub const ARG_COMMIT: &str = "COMMIT";
pub const ARG_TARGETARCH: &str = "TARGETARCH";
pub const ARG_TARGETOS: &str = "TARGETOS";

/// A specification document: an optional syntax directive rendered as a
/// comment line, followed by the keyed content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecDocument {
    #[serde(skip)]
    pub syntax: Option<String>,
    #[serde(flatten)]
    pub root: DocMap,
}

impl Default for SpecDocument {
    fn default() -> Self {
        Self::new(DEFAULT_FRONTEND)
    }
}

impl SpecDocument {
    pub fn new(frontend: &str) -> Self {
        Self {
            syntax: Some(frontend.to_string()),
            root: DocMap::new(),
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<DocValue>) {
        self.root.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&DocValue> {
        self.root.get(key)
    }

    /// Section by name, or an empty map when it is absent or not a map
    pub fn section(&self, key: &str) -> &DocMap {
        static EMPTY: std::sync::OnceLock<DocMap> = std::sync::OnceLock::new();
        self.root
            .get(key)
            .and_then(DocValue::as_map)
            .unwrap_or_else(|| EMPTY.get_or_init(DocMap::new))
    }

    fn scalar(&self, key: &str) -> &str {
        self.root
            .get(key)
            .and_then(DocValue::as_str)
            .unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.scalar("name")
    }

    pub fn license(&self) -> &str {
        self.scalar("license")
    }

    pub fn website(&self) -> &str {
        self.scalar("website")
    }

    pub fn description(&self) -> &str {
        self.scalar("description")
    }

    pub fn arg(&self, key: &str) -> &str {
        self.section("args")
            .get(key)
            .and_then(DocValue::as_str)
            .unwrap_or_default()
    }

    pub fn set_arg(&mut self, key: &str, value: impl Into<DocValue>) {
        match self.root.get_mut("args").and_then(DocValue::as_map_mut) {
            Some(args) => args.insert(key, value),
            None => {
                let mut args = DocMap::new();
                args.insert(key, value);
                self.root.insert("args", args);
            }
        }
    }

    pub fn revision_arg(&self) -> &str {
        self.arg(ARG_REVISION)
    }

    pub fn commit_arg(&self) -> &str {
        self.arg(ARG_COMMIT)
    }

    /// URL of the first git source, empty when not resolved
    pub fn source_url(&self) -> &str {
        self.section("sources")
            .iter()
            .find_map(|(_, source)| source.pointer("git.url").and_then(DocValue::as_str))
            .unwrap_or_default()
    }

    /// Re-key the root so the known sections come first, in order
    pub fn normalize_order(&mut self) {
        let mut ordered = DocMap::new();
        for key in SECTION_ORDER {
            if let Some(value) = self.root.remove(key) {
                ordered.insert(*key, value);
            }
        }
        let remaining: Vec<String> = self.root.keys().map(str::to_string).collect();
        for key in remaining {
            if let Some(value) = self.root.remove(&key) {
                ordered.insert(key, value);
            }
        }
        self.root = ordered;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_arg_creates_section() {
        let mut doc = SpecDocument::default();
        doc.set_arg(ARG_REVISION, "4");

        assert_eq!(doc.revision_arg(), "4");
        assert_eq!(doc.arg("MISSING"), "");
    }

    #[test]
    fn test_missing_scalars_are_empty() {
        let doc = SpecDocument::default();
        assert_eq!(doc.name(), "");
        assert_eq!(doc.source_url(), "");
        assert!(doc.section("sources").is_empty());
    }

    #[test]
    fn test_normalize_order() {
        let mut doc = SpecDocument::default();
        doc.set("tests", DocValue::empty_list());
        doc.set("custom", "x");
        doc.set("name", "app");
        doc.set("args", DocValue::empty_map());
        doc.normalize_order();

        assert_eq!(
            doc.root.keys().collect::<Vec<_>>(),
            vec!["args", "name", "tests", "custom"]
        );
    }

    #[test]
    fn test_source_url_reads_first_git_source() {
        let mut git = DocMap::new();
        git.insert("url", "https://github.com/acme/app");
        let mut source = DocMap::new();
        source.insert("git", git);
        let mut sources = DocMap::new();
        sources.insert("app", source);

        let mut doc = SpecDocument::default();
        doc.set("sources", sources);

        assert_eq!(doc.source_url(), "https://github.com/acme/app");
    }
}
