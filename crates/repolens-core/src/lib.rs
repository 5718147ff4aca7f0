pub mod analytics;
pub mod config;
pub mod graph;
pub mod manifest;
pub mod profile;
pub mod signal;
pub mod tree;
pub mod types;

pub use config::Config;
pub use graph::{build_graph, ArchitectureEdge, ArchitectureGraph, ArchitectureNode};
pub use manifest::{resolve_manifest, Manifest};
pub use profile::{aggregate, RepositoryProfile, TechFlags};
pub use signal::{classify, SignalCategory, TechnologySignal};
pub use types::*;

use serde::{Deserialize, Serialize};

/// Complete engine output for one listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub profile: RepositoryProfile,
    pub graph: ArchitectureGraph,
}

/// Run the full pipeline over a listing: resolve the manifest, fold the
/// classifier into a profile, and map the profile onto the node catalogue.
/// Pure and synchronous; safe to call concurrently.
pub fn analyze(entries: &[FileEntry]) -> Analysis {
    let manifest = resolve_manifest(entries);
    let profile = aggregate(entries, manifest.as_ref());
    let graph = build_graph(&profile);
    Analysis { profile, graph }
}
