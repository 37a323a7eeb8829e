//! Reading a previously generated specification

use anyhow::{Context, Result};
use serde_yaml::Value;
use std::path::Path;
use tracing::info;

const DEFAULT_REVISION: &str = "1";

/// Fields carried over from the last generated specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviousSpec {
    /// Recorded source commit, empty if absent
    pub commit: String,
    /// Recorded revision, as written
    pub revision: String,
}

impl Default for PreviousSpec {
    fn default() -> Self {
        Self {
            commit: String::new(),
            revision: DEFAULT_REVISION.to_string(),
        }
    }
}

impl PreviousSpec {
    pub fn new(commit: impl Into<String>, revision: impl Into<String>) -> Self {
        Self {
            commit: commit.into(),
            revision: revision.into(),
        }
    }

    /// Read a previous specification. A missing file is not an error.
    pub fn from_path(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            info!(
                "No previous specification at {}, starting a fresh revision",
                path.display()
            );
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read previous specification: {}", path.display()))?;

        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse previous specification: {}", path.display()))
            .map(Some)
    }

    /// Commit and revision come from the `args` section, falling back to
    /// top-level `commit` / `revision` keys.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let document: Value =
            serde_yaml::from_str(content).context("Previous specification is not valid YAML")?;

        let lookup = |arg: &str, top_level: &str| {
            scalar(&document["args"][arg]).or_else(|| scalar(&document[top_level]))
        };

        let commit = lookup("COMMIT", "commit").unwrap_or_default();
        let revision = lookup("REVISION", "revision")
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_REVISION.to_string());

        Ok(Self { commit, revision })
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
