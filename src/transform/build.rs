//! `build` section: environment and shell steps from builder stages

use super::{RuleContext, SectionRule};
use crate::classify;
use crate::document::{DocMap, DocValue};
use std::collections::BTreeMap;

/// Stage ENV keys that belong to the args section
const EXCLUDED_ENV: &[&str] = &["OS", "ARCH", "VERSION"];

/// Package installation lines are covered by the dependencies section
const PACKAGE_INSTALL_MARKERS: &[&str] = &["apt-get", "yum install", "tdnf install"];

pub struct BuildRule;

impl SectionRule for BuildRule {
    fn section(&self) -> &'static str {
        "build"
    }

    fn apply(&self, ctx: &RuleContext<'_>) -> DocValue {
        let mut env = BTreeMap::new();
        env.insert("VERSION".to_string(), "${VERSION}".to_string());

        let mut steps = Vec::new();

        for stage in classify::builder_stages(ctx.stages()) {
            for (key, value) in &stage.env {
                if !EXCLUDED_ENV.contains(&key.as_str()) {
                    env.insert(key.clone(), value.clone());
                }
            }

            if classify::uses_toolchain(stage, ctx.toolchain) {
                for (key, value) in ctx.toolchain.build_env() {
                    env.insert(key.to_string(), value.to_string());
                }
            }

            let commands: Vec<&str> = stage
                .run_commands
                .iter()
                .map(String::as_str)
                .filter(|run| !PACKAGE_INSTALL_MARKERS.iter().any(|m| run.contains(m)))
                .collect();

            if commands.is_empty() {
                continue;
            }

            let mut command = commands.join("\n");
            if !stage.workdir.is_empty() && !command.contains("cd ") {
                command = format!("cd {}\n{}", stage.workdir, command);
            }

            let mut step = DocMap::new();
            step.insert("command", command);
            steps.push(DocValue::Map(step));
        }

        let mut build = DocMap::new();
        build.insert("env", env.into_iter().collect::<DocMap>());
        if !steps.is_empty() {
            build.insert("steps", DocValue::List(steps));
        }

        DocValue::Map(build)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BuildModel, Stage};
    use crate::toolchain::GoToolchain;

    fn apply(stages: Vec<Stage>) -> DocValue {
        let model = BuildModel {
            stages,
            ..Default::default()
        };
        BuildRule.apply(&RuleContext::new(&model, None, &GoToolchain))
    }

    fn env_of(stage: &Stage, pairs: &[(&str, &str)]) -> Stage {
        Stage {
            env: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..stage.clone()
        }
    }

    fn builder(workdir: &str, runs: &[&str]) -> Stage {
        Stage {
            name: "builder".to_string(),
            workdir: workdir.to_string(),
            run_commands: runs.iter().map(|r| r.to_string()).collect(),
            ..Default::default()
        }
    }

    fn step_commands(build: &DocValue) -> Vec<&str> {
        build
            .pointer("steps")
            .and_then(DocValue::as_list)
            .unwrap_or_default()
            .iter()
            .filter_map(|step| step.pointer("command").and_then(DocValue::as_str))
            .collect()
    }

    #[test]
    fn test_go_builder_steps_and_env() {
        let stage = env_of(
            &builder("/src", &["apt-get update && apt-get install -y git", "go build -o bin/app ."]),
            &[("GOFLAGS", "-mod=vendor"), ("VERSION", "9"), ("CGO_ENABLED", "0")],
        );
        let build = apply(vec![stage]);

        assert_eq!(step_commands(&build), vec!["cd /src\ngo build -o bin/app ."]);

        let env = build.pointer("env").unwrap();
        assert_eq!(env.pointer("VERSION").and_then(DocValue::as_str), Some("${VERSION}"));
        assert_eq!(env.pointer("GOFLAGS").and_then(DocValue::as_str), Some("-mod=vendor"));
        assert_eq!(env.pointer("GOPROXY").and_then(DocValue::as_str), Some("direct"));
        assert_eq!(env.pointer("GOEXPERIMENT").and_then(DocValue::as_str), Some("systemcrypto"));
        // toolchain defaults win over stage ENV
        assert_eq!(env.pointer("CGO_ENABLED").and_then(DocValue::as_str), Some("1"));
    }

    #[test]
    fn test_existing_cd_is_kept() {
        let build = apply(vec![builder("/src", &["cd /src/cmd && make"])]);
        assert_eq!(step_commands(&build), vec!["cd /src/cmd && make"]);
    }

    #[test]
    fn test_one_step_per_builder_stage() {
        let build = apply(vec![
            builder("", &["make deps", "make all"]),
            builder("", &["tdnf install -y gcc"]),
            Stage {
                name: "runtime".to_string(),
                run_commands: vec!["echo runtime".to_string()],
                ..Default::default()
            },
        ]);

        assert_eq!(step_commands(&build), vec!["make deps\nmake all"]);
    }

    #[test]
    fn test_env_only_without_steps() {
        let build = apply(vec![Stage {
            name: "runtime".to_string(),
            ..Default::default()
        }]);

        assert!(build.pointer("steps").is_none());
        assert_eq!(build.pointer("env").and_then(DocValue::as_map).map(DocMap::len), Some(1));
    }
}
