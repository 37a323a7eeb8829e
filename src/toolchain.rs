//! Language toolchain signatures
//!
//! A toolchain is recognised from the commands a stage runs. Once found it
//! contributes a build dependency, target runtime dependencies, build
//! environment defaults and a source generator to the generated spec.

use crate::model::Stage;

pub trait Toolchain: Send + Sync {
    fn id(&self) -> &'static str;

    /// Substrings of a RUN command that prove the toolchain is invoked
    fn run_signatures(&self) -> &[&'static str];

    /// Whether a base image reference is the toolchain's own image
    fn matches_base_image(&self, base_ref: &str) -> bool;

    /// Synthetic build dependency identifier
    fn build_dependency(&self) -> &'static str;

    /// Target identifier that receives the runtime dependencies
    fn runtime_target(&self) -> &'static str;

    fn runtime_dependencies(&self) -> &[&'static str];

    /// Build environment defaults, applied after stage ENV
    fn build_env(&self) -> &[(&'static str, &'static str)];

    /// Source generator marker attached to the source entry
    fn source_generator(&self) -> &'static str;

    fn is_invoked_by(&self, stage: &Stage) -> bool {
        stage.run_commands.iter().any(|run| {
            self.run_signatures()
                .iter()
                .any(|signature| run.contains(signature))
        })
    }
}

pub struct GoToolchain;

impl Toolchain for GoToolchain {
    fn id(&self) -> &'static str {
        "go"
    }

    fn run_signatures(&self) -> &[&'static str] {
        &["go build", "go mod"]
    }

    fn matches_base_image(&self, base_ref: &str) -> bool {
        let image = base_ref.rsplit('/').next().unwrap_or(base_ref);
        let repository = image.split([':', '@']).next().unwrap_or(image);
        repository == "go" || repository.starts_with("golang")
    }

    fn build_dependency(&self) -> &'static str {
        "msft-golang"
    }

    fn runtime_target(&self) -> &'static str {
        "azlinux3"
    }

    fn runtime_dependencies(&self) -> &[&'static str] {
        &["openssl-libs", "SymCrypt", "SymCrypt-OpenSSL"]
    }

    fn build_env(&self) -> &[(&'static str, &'static str)] {
        &[
            ("GOPROXY", "direct"),
            ("GOEXPERIMENT", "systemcrypto"),
            ("CGO_ENABLED", "1"),
        ]
    }

    fn source_generator(&self) -> &'static str {
        "gomod"
    }
}

/// Toolchain used when callers do not pick one explicitly
pub fn default_toolchain() -> &'static dyn Toolchain {
    &GoToolchain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_go_signatures() {
        let stage = Stage {
            run_commands: vec!["cd /src && go mod download".to_string()],
            ..Default::default()
        };
        assert!(GoToolchain.is_invoked_by(&stage));

        let stage = Stage {
            run_commands: vec!["make all".to_string()],
            ..Default::default()
        };
        assert!(!GoToolchain.is_invoked_by(&stage));
    }

    #[test]
    fn test_go_base_images() {
        assert!(GoToolchain.matches_base_image("golang:1.21"));
        assert!(GoToolchain.matches_base_image("mcr.microsoft.com/oss/go/microsoft/golang:1.22"));
        assert!(GoToolchain.matches_base_image("go"));
        assert!(!GoToolchain.matches_base_image("gcr.io/distroless/static"));
        assert!(!GoToolchain.matches_base_image("gopher:latest"));
    }
}
