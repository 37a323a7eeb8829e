//! Revision reconciliation against a previously generated specification
//!
//! Regenerating for the same source commit bumps the revision counter; a new
//! commit starts again from the generated default.

use crate::document::{PreviousSpec, SpecDocument};
use crate::document::spec::ARG_REVISION;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Outcome of comparing the previous and current source commits
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Reconciliation {
    /// No previous commit recorded
    Fresh,
    /// Same commit as last time; revision is bumped to `next`
    Unchanged { next: u64 },
    /// Same commit but the previous revision was not an integer
    Reset { invalid: String },
    /// The source moved on; the default revision is kept
    Stale { previous_commit: String },
}

pub fn reconcile(previous: Option<&PreviousSpec>, current_commit: &str) -> Reconciliation {
    let Some(previous) = previous.filter(|p| !p.commit.is_empty()) else {
        debug!("No previous commit recorded, keeping default revision");
        return Reconciliation::Fresh;
    };

    if previous.commit != current_commit {
        debug!(
            previous = %previous.commit,
            current = %current_commit,
            "Source commit changed, revision not bumped"
        );
        return Reconciliation::Stale {
            previous_commit: previous.commit.clone(),
        };
    }

    match previous.revision.trim().parse::<u64>() {
        Ok(revision) => Reconciliation::Unchanged {
            next: revision.saturating_add(1),
        },
        Err(e) => {
            warn!(
                revision = %previous.revision,
                error = %e,
                "Previous revision is not an integer, resetting"
            );
            Reconciliation::Reset {
                invalid: previous.revision.clone(),
            }
        }
    }
}

impl Reconciliation {
    /// Write the reconciled revision into `args.REVISION`
    pub fn apply(&self, doc: &mut SpecDocument) {
        if let Reconciliation::Unchanged { next } = self {
            doc.set_arg(ARG_REVISION, next.to_string());
        }
    }

    pub fn next_revision(&self) -> Option<u64> {
        match self {
            Reconciliation::Unchanged { next } => Some(*next),
            _ => None,
        }
    }
}

impl fmt::Display for Reconciliation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reconciliation::Fresh => write!(f, "no previous spec, default revision"),
            Reconciliation::Unchanged { next } => {
                write!(f, "same commit, revision bumped to {}", next)
            }
            Reconciliation::Reset { invalid } => {
                write!(f, "invalid previous revision '{}', reset", invalid)
            }
            Reconciliation::Stale { previous_commit } => {
                write!(f, "commit changed from {}, default revision", previous_commit)
            }
        }
    }
}
