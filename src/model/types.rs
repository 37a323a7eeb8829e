//! Build model data structures

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Result of turning an instruction stream into stages
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildModel {
    /// Stages in declaration order
    pub stages: Vec<Stage>,
    /// Global ARG declarations (name -> default, possibly empty)
    pub global_args: BTreeMap<String, String>,
    /// LABEL metadata with surrounding quotes stripped
    pub labels: BTreeMap<String, String>,
    /// Instructions that were skipped or only partially understood
    pub warnings: Vec<BuildWarning>,
}

/// One build phase, from a `FROM` to the next `FROM` or end of file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stage {
    /// Name from `AS <name>`, empty when unnamed
    pub name: String,
    /// Base image reference
    pub base_ref: String,
    /// Platform from `--platform=`, empty when absent
    pub platform: String,
    pub args: BTreeMap<String, String>,
    pub env: BTreeMap<String, String>,
    /// Last declared WORKDIR only
    pub workdir: String,
    pub run_commands: Vec<String>,
    pub copy_instructions: Vec<CopyInstruction>,
    pub entrypoint: Vec<String>,
    pub cmd: Vec<String>,
    pub exposed_ports: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CopyKind {
    Copy,
    Add,
}

impl fmt::Display for CopyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyKind::Copy => write!(f, "COPY"),
            CopyKind::Add => write!(f, "ADD"),
        }
    }
}

/// A COPY or ADD instruction. The last positional argument is the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyInstruction {
    pub kind: CopyKind,
    /// Stage reference from `--from=`, empty when copying from the context
    pub from_stage: String,
    pub sources: Vec<String>,
    pub dest: String,
}

/// A recovered structural fault, kept so callers can inspect it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildWarning {
    pub line: usize,
    pub instruction: String,
    pub message: String,
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.instruction, self.message)
    }
}

impl Stage {
    /// Stage name, or a positional label for unnamed stages
    pub fn display_name(&self, index: usize) -> String {
        if self.name.is_empty() {
            format!("(unnamed stage {})", index)
        } else {
            self.name.clone()
        }
    }
}

impl BuildModel {
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Global ARG default, treating empty values as undeclared
    pub fn global_arg(&self, key: &str) -> Option<&str> {
        self.global_args
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

impl fmt::Display for BuildModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Build Model")?;
        writeln!(f, "===========")?;

        if !self.global_args.is_empty() {
            writeln!(f, "Global ARGs:")?;
            for (key, value) in &self.global_args {
                if value.is_empty() {
                    writeln!(f, "  - {} (no default)", key)?;
                } else {
                    writeln!(f, "  - {} = {}", key, value)?;
                }
            }
        }

        if !self.labels.is_empty() {
            writeln!(f, "Labels:")?;
            for (key, value) in &self.labels {
                writeln!(f, "  - {} = {}", key, value)?;
            }
        }

        writeln!(f, "Stages: {}", self.stages.len())?;
        for (i, stage) in self.stages.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "Stage {}: {}", i, stage.display_name(i))?;
            writeln!(f, "  Base:       {}", stage.base_ref)?;
            if !stage.platform.is_empty() {
                writeln!(f, "  Platform:   {}", stage.platform)?;
            }
            if !stage.workdir.is_empty() {
                writeln!(f, "  Workdir:    {}", stage.workdir)?;
            }
            for (key, value) in &stage.env {
                writeln!(f, "  ENV {} = {}", key, value)?;
            }
            for run in &stage.run_commands {
                writeln!(f, "  RUN {}", truncate(run, 70))?;
            }
            for copy in &stage.copy_instructions {
                let from = if copy.from_stage.is_empty() {
                    String::new()
                } else {
                    format!(" (from {})", copy.from_stage)
                };
                writeln!(
                    f,
                    "  {} {} -> {}{}",
                    copy.kind,
                    copy.sources.join(" "),
                    copy.dest,
                    from
                )?;
            }
            if !stage.entrypoint.is_empty() {
                writeln!(f, "  Entrypoint: {:?}", stage.entrypoint)?;
            }
            if !stage.cmd.is_empty() {
                writeln!(f, "  Cmd:        {:?}", stage.cmd)?;
            }
            if !stage.exposed_ports.is_empty() {
                writeln!(f, "  Expose:     {}", stage.exposed_ports.join(", "))?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "  - {}", warning)?;
            }
        }

        Ok(())
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
}
