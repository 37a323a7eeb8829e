//! dalec-mapper - Dalec build specifications from multi-stage Dockerfiles
//!
//! A Dockerfile is lexed into instruction nodes, folded into a typed build
//! model, and transformed section by section into a Dalec spec document.
//! Repository metadata from GitHub fills in the package fields, and a
//! previously generated spec drives the revision counter.
//!
//! # Example
//!
//! ```no_run
//! use dalec_mapper::{GenerationInput, SpecGenerator};
//!
//! # fn example() -> anyhow::Result<()> {
//! let report = SpecGenerator::default()
//!     .generate(&GenerationInput::new("Dockerfile").with_previous("widget.yml"))?;
//!
//! println!("{}", dalec_mapper::document::to_yaml(&report.document)?);
//! for field in &report.manual_fields {
//!     eprintln!("needs manual input: {}", field);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`syntax`]: Dockerfile lexer
//! - [`model`]: build model and its builder
//! - [`classify`]: stage role heuristics
//! - [`toolchain`]: language toolchain signatures
//! - [`transform`]: section rules producing the spec
//! - [`revision`]: revision reconciliation
//! - [`github`]: repository metadata source

pub mod classify;
pub mod cli;
pub mod config;
pub mod document;
pub mod generator;
pub mod github;
pub mod model;
pub mod revision;
pub mod syntax;
pub mod toolchain;
pub mod transform;
pub mod util;

pub use config::{ConfigError, GeneratorConfig};
pub use document::{PreviousSpec, SpecDocument};
pub use generator::{GenerationInput, GenerationReport, GeneratorOptions, ManualField, SpecGenerator};
pub use github::{GitHubClient, GitHubError, MetadataSource, RepoInfo, RepoRef};
pub use model::{BuildModel, ModelBuilder, Stage};
pub use revision::{reconcile, Reconciliation};
pub use syntax::{InstructionNode, SyntaxError};
pub use transform::{RepoMetadata, TransformOptions, Transformer};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_dalec_mapper() {
        assert_eq!(NAME, "dalec-mapper");
    }
}
