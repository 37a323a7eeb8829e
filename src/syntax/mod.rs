//! Build-file lexing
//!
//! Turns raw Dockerfile text into a flat sequence of [`InstructionNode`]s.
//! The lexer only tokenizes; it knows nothing about stages, arguments or
//! any other build semantics. That is the job of [`crate::model`].

pub mod lexer;
pub mod node;

pub use lexer::{parse, SyntaxError};
pub use node::{Heredoc, InstructionNode};
