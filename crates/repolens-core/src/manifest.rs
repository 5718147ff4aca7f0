use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{EntryKind, FileEntry};

/// Canonical dependency-manifest filename, expected at the repository root.
pub const MANIFEST_FILENAME: &str = "package.json";

/// Normalized view of the repository's dependency manifest.
/// Immutable once built; constructed at most once per analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Package name to declared version-range string. Regular and dev
    /// dependency groups are merged; regular entries win on collision.
    pub dependencies: BTreeMap<String, String>,
}

impl Manifest {
    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies.contains_key(name)
    }
}

/// Find and parse the root manifest in a listing.
///
/// Returns `None` when no root `package.json` exists, when it carries no
/// content, or when its content is not valid JSON. A malformed manifest is
/// logged and the analysis degrades to path-only classification; it is
/// never an error.
pub fn resolve_manifest(entries: &[FileEntry]) -> Option<Manifest> {
    let entry = entries
        .iter()
        .find(|e| e.kind == EntryKind::Blob && e.path == MANIFEST_FILENAME)?;
    let content = entry.content.as_deref()?;

    match parse_manifest(content) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            tracing::warn!(error = %e, "malformed package.json, falling back to path-only classification");
            None
        }
    }
}

fn parse_manifest(content: &str) -> Result<Manifest, serde_json::Error> {
    let json: Value = serde_json::from_str(content)?;
    let mut dependencies = BTreeMap::new();

    // Regular dependencies first so they win name collisions with dev.
    for group in ["dependencies", "devDependencies"] {
        if let Some(deps) = json.get(group).and_then(|d| d.as_object()) {
            for (name, version) in deps {
                if let Some(range) = version.as_str() {
                    dependencies
                        .entry(name.clone())
                        .or_insert_with(|| range.to_string());
                }
            }
        }
    }

    Ok(Manifest { dependencies })
}
