//! Structured build model
//!
//! The model is the typed view of a multi-stage build file: an ordered list
//! of stages, global `ARG` defaults and labels. [`ModelBuilder`] produces it
//! from lexed [`InstructionNode`](crate::syntax::InstructionNode)s.

pub mod builder;
pub mod types;

pub use builder::ModelBuilder;
pub use types::{BuildModel, BuildWarning, CopyInstruction, CopyKind, Stage};
