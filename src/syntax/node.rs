//! Instruction node produced by the lexer

use serde::Serialize;

/// One instruction of a build file, already split into flags and arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructionNode {
    /// Instruction keyword as written (e.g. `FROM`, `run`)
    pub name: String,
    /// Leading `--key=value` flags, in declaration order
    pub flags: Vec<String>,
    /// Positional arguments, in declaration order
    pub args: Vec<String>,
    /// True when the arguments came from a JSON array (exec form)
    pub json: bool,
    /// 1-based line number where the instruction starts
    pub line: usize,
    /// Heredoc bodies that follow the instruction line, in marker order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub heredocs: Vec<Heredoc>,
}

/// A `<<NAME` body attached to `RUN`, `COPY` or `ADD`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heredoc {
    pub name: String,
    /// Lines between the marker and the terminator, joined with `\n`
    pub body: String,
}

impl InstructionNode {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            flags: Vec::new(),
            args,
            json: false,
            line: 0,
            heredocs: Vec::new(),
        }
    }

    pub fn with_flags(mut self, flags: Vec<String>) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    pub fn with_heredocs(mut self, heredocs: Vec<Heredoc>) -> Self {
        self.heredocs = heredocs;
        self
    }

    /// Upper-cased instruction keyword used for dispatch
    pub fn keyword(&self) -> String {
        self.name.to_uppercase()
    }

    /// Value of the first `--<key>=<value>` flag, if present
    pub fn flag(&self, key: &str) -> Option<&str> {
        let prefix = format!("--{}=", key);
        self.flags
            .iter()
            .find_map(|flag| flag.strip_prefix(prefix.as_str()))
    }
}
