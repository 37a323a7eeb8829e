//! Stage role classification
//!
//! Stateless heuristics answering which stage compiles, which stage ships,
//! and whether a stage drives a language toolchain.

use crate::model::Stage;
use crate::toolchain::{default_toolchain, Toolchain};

/// Name assumed for the compile stage when no stage is recognisably one
pub const DEFAULT_BUILDER_NAME: &str = "builder";

/// Stage names that only select a platform flavour of the final image
const PLATFORM_SUFFIX_STAGES: &[&str] = &["windows", "hpc"];

pub fn is_builder_stage(stage: &Stage) -> bool {
    let name = stage.name.to_lowercase();
    name == DEFAULT_BUILDER_NAME || name.contains("build")
}

pub fn uses_language_toolchain(stage: &Stage) -> bool {
    uses_toolchain(stage, default_toolchain())
}

pub fn uses_toolchain(stage: &Stage, toolchain: &dyn Toolchain) -> bool {
    toolchain.is_invoked_by(stage)
}

/// Last stage, scanning backwards, that is not a platform flavour and
/// declares an entrypoint or copies something in.
pub fn final_stage_candidate(stages: &[Stage]) -> Option<&Stage> {
    stages.iter().rev().find(|stage| {
        let name = stage.name.to_lowercase();
        !PLATFORM_SUFFIX_STAGES.contains(&name.as_str())
            && (!stage.entrypoint.is_empty() || !stage.copy_instructions.is_empty())
    })
}

/// Name of the first builder stage, or [`DEFAULT_BUILDER_NAME`].
pub fn builder_stage_name(stages: &[Stage]) -> &str {
    stages
        .iter()
        .find(|stage| is_builder_stage(stage))
        .map(|stage| stage.name.as_str())
        .unwrap_or(DEFAULT_BUILDER_NAME)
}

pub fn builder_stages(stages: &[Stage]) -> impl Iterator<Item = &Stage> {
    stages.iter().filter(|stage| is_builder_stage(stage))
}

/// True when a copy source stage refers to the resolved builder stage
pub fn is_builder_reference(from_stage: &str, builder_name: &str) -> bool {
    !from_stage.is_empty() && (from_stage == builder_name || from_stage == DEFAULT_BUILDER_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CopyInstruction, CopyKind};
    use yare::parameterized;

    fn named(name: &str) -> Stage {
        Stage {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn with_copy(name: &str) -> Stage {
        Stage {
            copy_instructions: vec![CopyInstruction {
                kind: CopyKind::Copy,
                from_stage: "builder".to_string(),
                sources: vec!["/app/bin/app".to_string()],
                dest: "/usr/local/bin/app".to_string(),
            }],
            ..named(name)
        }
    }

    #[parameterized(
        builder = { "builder", true },
        upper_case = { "BUILDER", true },
        build_prefix = { "build-env", true },
        go_build = { "gobuild", true },
        runtime = { "runtime", false },
        unnamed = { "", false },
        builder_typo = { "buider", false },
    )]
    fn test_is_builder_stage(name: &str, expected: bool) {
        assert_eq!(is_builder_stage(&named(name)), expected);
    }

    #[test]
    fn test_uses_language_toolchain() {
        let stage = Stage {
            run_commands: vec!["go build -o bin/app ./main.go".to_string()],
            ..named("builder")
        };
        assert!(uses_language_toolchain(&stage));
        assert!(!uses_language_toolchain(&named("builder")));
    }

    #[test]
    fn test_final_stage_skips_platform_flavours() {
        let stages = vec![named("builder"), with_copy("linux"), with_copy("windows")];
        let final_stage = final_stage_candidate(&stages).unwrap();
        assert_eq!(final_stage.name, "linux");
    }

    #[test]
    fn test_final_stage_requires_content() {
        let mut runtime = named("runtime");
        runtime.entrypoint = vec!["/app".to_string()];
        let stages = vec![runtime, named("empty")];

        assert_eq!(final_stage_candidate(&stages).unwrap().name, "runtime");
        assert!(final_stage_candidate(&[named("empty")]).is_none());
        assert!(final_stage_candidate(&[]).is_none());
    }

    #[test]
    fn test_builder_stage_name_first_match() {
        let stages = vec![named("base"), named("build-linux"), named("builder")];
        assert_eq!(builder_stage_name(&stages), "build-linux");
    }

    #[test]
    fn test_builder_stage_name_fallback() {
        assert_eq!(builder_stage_name(&[named("runtime")]), DEFAULT_BUILDER_NAME);
        assert_eq!(builder_stage_name(&[]), DEFAULT_BUILDER_NAME);
    }

    #[test]
    fn test_builder_reference() {
        assert!(is_builder_reference("build-linux", "build-linux"));
        assert!(is_builder_reference("builder", "build-linux"));
        assert!(!is_builder_reference("", "builder"));
        assert!(!is_builder_reference("base", "builder"));
    }
}
