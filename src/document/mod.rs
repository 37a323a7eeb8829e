//! Generated specification document
//!
//! The document schema is open: source, dependency and target names are only
//! known at run time, so sections are built from [`DocValue`] trees. The keys
//! that are always present get typed accessors on [`SpecDocument`].

pub mod previous;
pub mod spec;
pub mod value;
pub mod writer;

pub use previous::PreviousSpec;
pub use spec::{SpecDocument, DEFAULT_FRONTEND, SECTION_ORDER};
pub use value::{DocMap, DocValue};
pub use writer::{to_json, to_yaml};
