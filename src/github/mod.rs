//! Repository metadata from GitHub
//!
//! [`RepoRef`] names a repository, a [`MetadataSource`] resolves it into a
//! [`RepoInfo`], and [`RepoInfo::to_metadata`] hands the result to the
//! transformation.

pub mod client;
pub mod repo;

pub use client::{GitHubClient, GitHubError, MetadataSource};
pub use repo::{RepoInfo, RepoRef};
