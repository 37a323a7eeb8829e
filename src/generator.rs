//! End-to-end specification generation
//!
//! Reads the build file, builds the model, transforms it with optional
//! repository metadata and reconciles the revision against a previously
//! generated specification.

use crate::document::{PreviousSpec, SpecDocument};
use crate::github::{MetadataSource, RepoRef};
use crate::model::{BuildModel, ModelBuilder};
use crate::revision::{self, Reconciliation};
use crate::syntax;
use crate::transform::{RepoMetadata, TransformOptions, Transformer};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    pub transform: TransformOptions,
}

/// What one generation run reads
#[derive(Debug, Clone)]
pub struct GenerationInput {
    pub dockerfile: PathBuf,
    /// Previously generated specification, if any
    pub previous: Option<PathBuf>,
    pub metadata: Option<RepoMetadata>,
}

impl GenerationInput {
    pub fn new(dockerfile: impl Into<PathBuf>) -> Self {
        Self {
            dockerfile: dockerfile.into(),
            previous: None,
            metadata: None,
        }
    }

    pub fn with_previous(mut self, previous: impl Into<PathBuf>) -> Self {
        self.previous = Some(previous.into());
        self
    }

    pub fn with_metadata(mut self, metadata: RepoMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Document fields that could not be filled automatically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManualField {
    SourceUrl,
    Description,
    License,
    Website,
    Commit,
}

impl fmt::Display for ManualField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ManualField::SourceUrl => "sources git url",
            ManualField::Description => "description",
            ManualField::License => "license",
            ManualField::Website => "website",
            ManualField::Commit => "args.COMMIT",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub document: SpecDocument,
    pub model: BuildModel,
    /// `None` when no previous specification path was given
    pub reconciliation: Option<Reconciliation>,
    pub manual_fields: Vec<ManualField>,
}

impl GenerationReport {
    pub fn needs_manual_input(&self) -> bool {
        !self.manual_fields.is_empty()
    }
}

pub struct SpecGenerator {
    transformer: Transformer,
}

impl Default for SpecGenerator {
    fn default() -> Self {
        Self::new(GeneratorOptions::default())
    }
}

impl SpecGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            transformer: Transformer::new(options.transform),
        }
    }

    pub fn generate(&self, input: &GenerationInput) -> Result<GenerationReport> {
        let model = load_model(&input.dockerfile)?;
        for warning in &model.warnings {
            debug!(%warning, "Build file warning");
        }

        let mut document = self.transformer.transform(&model, input.metadata.as_ref());

        let reconciliation = match &input.previous {
            Some(path) => {
                let previous = PreviousSpec::from_path(path)?;
                let outcome = revision::reconcile(previous.as_ref(), document.commit_arg());
                outcome.apply(&mut document);
                info!(%outcome, "Revision reconciled");
                Some(outcome)
            }
            None => None,
        };

        let manual_fields = manual_fields(&document);
        if !manual_fields.is_empty() {
            warn!(
                count = manual_fields.len(),
                "Some fields need manual input"
            );
        }

        Ok(GenerationReport {
            document,
            model,
            reconciliation,
            manual_fields,
        })
    }
}

/// Lex and model a build file. A missing file yields an empty model.
pub fn load_model(path: &Path) -> Result<BuildModel> {
    if !path.exists() {
        info!(
            "Build file {} not found, generating from an empty model",
            path.display()
        );
        return Ok(BuildModel::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read build file: {}", path.display()))?;
    let nodes = syntax::parse(&content)
        .with_context(|| format!("Failed to parse build file: {}", path.display()))?;

    let model = ModelBuilder::from_nodes(&nodes);
    info!(
        stages = model.stages.len(),
        warnings = model.warnings.len(),
        "Parsed build file {}",
        path.display()
    );
    Ok(model)
}

/// Resolve a repository reference through a metadata source
pub async fn fetch_metadata(source: &dyn MetadataSource, reference: &str) -> Result<RepoMetadata> {
    let repo = RepoRef::parse(reference)?;
    let info = source
        .fetch(&repo)
        .await
        .with_context(|| format!("Failed to fetch metadata for {}", repo))?;
    Ok(info.to_metadata())
}

fn manual_fields(doc: &SpecDocument) -> Vec<ManualField> {
    [
        (ManualField::SourceUrl, doc.source_url()),
        (ManualField::Description, doc.description()),
        (ManualField::License, doc.license()),
        (ManualField::Website, doc.website()),
        (ManualField::Commit, doc.commit_arg()),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(field, _)| field)
    .collect()
}
