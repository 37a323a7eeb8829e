//! Instruction model builder
//!
//! Walks the lexed instruction stream once and fills a [`BuildModel`].
//! The stage currently being populated is tracked as an index into
//! `model.stages`; every earlier stage is frozen as soon as a later `FROM`
//! opens a new one.

use super::types::{BuildModel, BuildWarning, CopyInstruction, CopyKind, Stage};
use crate::syntax::InstructionNode;
use tracing::{debug, warn};

/// Shell used to wrap shell-form ENTRYPOINT and CMD
const DEFAULT_SHELL: &str = "/bin/sh";

#[derive(Debug, Default)]
pub struct ModelBuilder {
    model: BuildModel,
    current: Option<usize>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from a complete instruction stream
    pub fn from_nodes(nodes: &[InstructionNode]) -> BuildModel {
        let mut builder = Self::new();
        for node in nodes {
            builder.apply(node);
        }
        builder.finish()
    }

    pub fn finish(self) -> BuildModel {
        debug!(
            stages = self.model.stages.len(),
            warnings = self.model.warnings.len(),
            "Build model complete"
        );
        self.model
    }

    /// Apply one instruction. Unknown instructions are ignored.
    pub fn apply(&mut self, node: &InstructionNode) {
        let keyword = node.keyword();

        match keyword.as_str() {
            "FROM" => self.apply_from(node),
            "ARG" => self.apply_arg(node),
            "LABEL" => self.apply_label(node),
            "ENV" | "WORKDIR" | "RUN" | "COPY" | "ADD" | "ENTRYPOINT" | "CMD" | "EXPOSE" => {
                match self.current {
                    Some(index) => self.apply_stage_instruction(index, &keyword, node),
                    None => self.warn(node, "appears before any FROM, ignored"),
                }
            }
            _ => debug!(line = node.line, instruction = %keyword, "Ignoring instruction"),
        }
    }

    fn apply_from(&mut self, node: &InstructionNode) {
        let mut stage = Stage {
            platform: node.flag("platform").unwrap_or_default().to_string(),
            ..Default::default()
        };

        match node.args.first() {
            Some(base) => stage.base_ref = base.clone(),
            None => self.warn(node, "missing base image reference"),
        }

        if let (Some(keyword), Some(name)) = (node.args.get(1), node.args.get(2)) {
            if keyword.eq_ignore_ascii_case("AS") {
                stage.name = name.clone();
            }
        }

        debug!(name = %stage.name, base = %stage.base_ref, "Opening stage");
        self.model.stages.push(stage);
        self.current = Some(self.model.stages.len() - 1);
    }

    fn apply_arg(&mut self, node: &InstructionNode) {
        let Some((key, value)) = parse_key_value(&node.args) else {
            self.warn(node, "missing argument name");
            return;
        };

        self.model.global_args.insert(key.clone(), value.clone());
        if let Some(index) = self.current {
            self.model.stages[index].args.insert(key, value);
        }
    }

    fn apply_label(&mut self, node: &InstructionNode) {
        let Some((key, value)) = parse_key_value(&node.args) else {
            self.warn(node, "missing label key");
            return;
        };

        self.model.labels.insert(key, strip_quotes(&value).to_string());
    }

    fn apply_stage_instruction(&mut self, index: usize, keyword: &str, node: &InstructionNode) {
        match keyword {
            "ENV" => match parse_key_value(&node.args) {
                Some((key, value)) => {
                    self.model.stages[index].env.insert(key, value);
                }
                None => self.warn(node, "missing variable name"),
            },
            "WORKDIR" => match node.args.first() {
                Some(path) => self.model.stages[index].workdir = path.clone(),
                None => self.warn(node, "missing path"),
            },
            "RUN" => {
                let command = run_command(node);
                if command.is_empty() {
                    self.warn(node, "empty command");
                } else {
                    self.model.stages[index].run_commands.push(command);
                }
            }
            "COPY" | "ADD" => match parse_copy(keyword, node) {
                Some(copy) => self.model.stages[index].copy_instructions.push(copy),
                None => self.warn(node, "no source or destination, skipped"),
            },
            "ENTRYPOINT" => self.model.stages[index].entrypoint = parse_command(node),
            "CMD" => self.model.stages[index].cmd = parse_command(node),
            "EXPOSE" => match node.args.first() {
                Some(port) => self.model.stages[index].exposed_ports.push(port.clone()),
                None => self.warn(node, "missing port"),
            },
            _ => {}
        }
    }

    fn warn(&mut self, node: &InstructionNode, message: &str) {
        let warning = BuildWarning {
            line: node.line,
            instruction: node.keyword(),
            message: message.to_string(),
        };
        warn!("Build file {}", warning);
        self.model.warnings.push(warning);
    }
}

/// Parse `key=value`, `key value` or a bare `key`.
///
/// The `=` form wins when the first word carries an `=`, so values that
/// themselves contain `=` (e.g. `GOFLAGS -mod=vendor`) keep the space split.
fn parse_key_value(args: &[String]) -> Option<(String, String)> {
    let full = args.join(" ");
    let full = full.trim();
    if full.is_empty() {
        return None;
    }

    let first_word = full.split_whitespace().next().unwrap_or_default();
    let (key, value) = if first_word.contains('=') {
        full.split_once('=').unwrap_or((full, ""))
    } else {
        full.split_once(' ').unwrap_or((full, ""))
    };

    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    Some((key.to_string(), value.trim().to_string()))
}

/// Remove one matching pair of surrounding quotes
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// A RUN made only of heredoc markers runs the bodies as its script.
/// Otherwise the heredocs are re-attached so the command stays valid shell.
fn run_command(node: &InstructionNode) -> String {
    let command = node.args.join(" ");
    if node.heredocs.is_empty() {
        return command;
    }

    if command.split_whitespace().all(|word| word.starts_with("<<")) {
        return node
            .heredocs
            .iter()
            .map(|heredoc| heredoc.body.as_str())
            .collect::<Vec<_>>()
            .join("\n");
    }

    let mut script = command;
    for heredoc in &node.heredocs {
        script.push('\n');
        script.push_str(&heredoc.body);
        script.push('\n');
        script.push_str(&heredoc.name);
    }
    script
}

fn parse_copy(keyword: &str, node: &InstructionNode) -> Option<CopyInstruction> {
    let (dest, sources) = node.args.split_last()?;

    Some(CopyInstruction {
        kind: if keyword == "ADD" {
            CopyKind::Add
        } else {
            CopyKind::Copy
        },
        from_stage: node.flag("from").unwrap_or_default().to_string(),
        sources: sources.to_vec(),
        dest: dest.clone(),
    })
}

/// JSON form is taken literally; shell form is wrapped as `/bin/sh -c <cmd>`.
fn parse_command(node: &InstructionNode) -> Vec<String> {
    if node.json {
        return node.args.clone();
    }

    let command = node.args.join(" ");
    if command.is_empty() {
        return Vec::new();
    }

    vec![DEFAULT_SHELL.to_string(), "-c".to_string(), command]
}
