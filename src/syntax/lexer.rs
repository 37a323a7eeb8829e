//! Dockerfile lexer
//!
//! Handles line continuations (`\`), comments, leading `--flag=value` words,
//! heredoc bodies and both shell and JSON (exec) argument forms. Variable
//! substitution is deliberately left alone.

use super::node::{Heredoc, InstructionNode};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, trace};

/// Instructions whose shell form is kept as a single argument
const SHELL_FORM_INSTRUCTIONS: &[&str] = &["RUN", "CMD", "ENTRYPOINT", "SHELL", "HEALTHCHECK"];

/// Instructions that may carry `<<NAME` heredocs
const HEREDOC_INSTRUCTIONS: &[&str] = &["RUN", "COPY", "ADD"];

/// Errors that make a build file unusable
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SyntaxError {
    /// The file contains nothing but blank lines and comments
    #[error("build file is empty or contains no instructions")]
    Empty,

    /// A logical line does not start with an instruction keyword
    #[error("line {line}: invalid instruction '{text}'")]
    InvalidInstruction { line: usize, text: String },
}

/// A logical line after continuation joining
struct LogicalLine {
    line: usize,
    text: String,
    heredocs: Vec<Heredoc>,
}

/// `<<NAME` or `<<-NAME`, optionally quoted
struct HeredocMarker {
    name: String,
    strip_tabs: bool,
}

/// Parse build-file text into instruction nodes
pub fn parse(content: &str) -> Result<Vec<InstructionNode>, SyntaxError> {
    let mut nodes = Vec::new();

    for logical in join_continuation_lines(content) {
        let node = parse_line(logical)?;
        trace!(line = node.line, instruction = %node.name, "Lexed instruction");
        nodes.push(node);
    }

    if nodes.is_empty() {
        return Err(SyntaxError::Empty);
    }

    Ok(nodes)
}

fn join_continuation_lines(content: &str) -> Vec<LogicalLine> {
    let mut logical_lines = Vec::new();
    let mut current = String::new();
    let mut start_line = 0;
    let mut lines = content.lines().enumerate();

    while let Some((idx, raw)) = lines.next() {
        let body = raw.trim();

        if body.is_empty() || body.starts_with('#') {
            // Comments and blank lines never end a continuation
            continue;
        }

        if current.is_empty() {
            start_line = idx + 1;
        }

        if let Some(stripped) = body.strip_suffix('\\') {
            current.push_str(stripped.trim_end());
            current.push(' ');
            continue;
        }

        current.push_str(body);
        let text = current.trim().to_string();
        current.clear();

        // Heredoc bodies are raw: no comment skipping, no continuations
        let heredocs = heredoc_markers(&text)
            .into_iter()
            .map(|marker| read_heredoc(marker, &mut lines))
            .collect();

        logical_lines.push(LogicalLine {
            line: start_line,
            text,
            heredocs,
        });
    }

    if !current.trim().is_empty() {
        logical_lines.push(LogicalLine {
            line: start_line,
            text: current.trim().to_string(),
            heredocs: Vec::new(),
        });
    }

    logical_lines
}

fn heredoc_markers(text: &str) -> Vec<HeredocMarker> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();

    let (keyword, _) = split_first_word(text);
    if !HEREDOC_INSTRUCTIONS.contains(&keyword.to_uppercase().as_str()) {
        return Vec::new();
    }

    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r#"<<(-?)["']?([A-Za-z_][A-Za-z0-9_]*)["']?"#).expect("valid regex")
    });

    pattern
        .captures_iter(text)
        // A marker starts a word; this also rules out `<<<` here-strings
        .filter(|caps| {
            caps.get(0)
                .is_some_and(|m| text[..m.start()].ends_with(char::is_whitespace))
        })
        .map(|caps| HeredocMarker {
            name: caps[2].to_string(),
            strip_tabs: !caps[1].is_empty(),
        })
        .collect()
}

/// Consume physical lines up to and including the terminator. An
/// unterminated heredoc takes the rest of the file.
fn read_heredoc<'a, I>(marker: HeredocMarker, lines: &mut I) -> Heredoc
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let mut body = Vec::new();

    for (_, raw) in lines.by_ref() {
        let line = if marker.strip_tabs {
            raw.trim_start_matches('\t')
        } else {
            raw
        };
        if line.trim_end() == marker.name {
            return Heredoc {
                name: marker.name,
                body: body.join("\n"),
            };
        }
        body.push(line);
    }

    debug!(name = %marker.name, "Heredoc runs to end of file");
    Heredoc {
        name: marker.name,
        body: body.join("\n"),
    }
}

fn parse_line(logical: LogicalLine) -> Result<InstructionNode, SyntaxError> {
    let (keyword, mut rest) = split_first_word(&logical.text);

    if keyword.is_empty() || !keyword.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(SyntaxError::InvalidInstruction {
            line: logical.line,
            text: logical.text.clone(),
        });
    }

    let mut flags = Vec::new();
    loop {
        let (word, remainder) = split_first_word(rest);
        if !word.starts_with("--") {
            break;
        }
        flags.push(word.to_string());
        rest = remainder;
    }

    let node = InstructionNode::new(keyword, Vec::new())
        .with_flags(flags)
        .with_line(logical.line)
        .with_heredocs(logical.heredocs);

    if rest.starts_with('[') {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(rest) {
            return Ok(InstructionNode { args: items, ..node }.with_json(true));
        }
    }

    let args = if SHELL_FORM_INSTRUCTIONS.contains(&keyword.to_uppercase().as_str()) {
        if rest.is_empty() {
            Vec::new()
        } else {
            vec![rest.to_string()]
        }
    } else {
        split_words(rest)
    };

    Ok(InstructionNode { args, ..node })
}

/// Split a string into the first word and the rest.
fn split_first_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.find(char::is_whitespace) {
        Some(pos) => (&s[..pos], s[pos..].trim_start()),
        None => (s, ""),
    }
}

/// Whitespace split that keeps quoted spans together (quotes retained)
fn split_words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in s.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None if c == '"' || c == '\'' => {
                current.push(c);
                quote = Some(c);
            }
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            None => current.push(c),
        }
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}
