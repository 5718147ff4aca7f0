//! GitHub REST input collaborator.
//!
//! Fetches a repository's metadata, file tree, and commit history and
//! normalizes the loosely-shaped API payloads into the strongly-typed
//! engine records at this boundary. The engine only ever sees the typed
//! records produced here, never raw API data.

pub mod client;
pub mod models;

pub use client::{parse_reference, GithubClient, GithubError, RepositorySnapshot};
pub use models::{normalize_commits, normalize_tree};
