use std::path::Path;

use anyhow::Result;
use walkdir::WalkDir;

use repolens_core::config::AnalysisConfig;
use repolens_core::types::{EntryKind, FileEntry};

/// Directories never worth descending into, regardless of config.
const SKIP_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "dist",
    "build",
    "target",
    ".next",
    "vendor",
    "__pycache__",
];

/// Walk a local directory into a repository listing.
///
/// Paths are forward-slash separated and relative to `root`. Raw text is
/// attached only for files on the configured content allow-list, within
/// the configured size bound.
pub fn list_directory(root: &Path, config: &AnalysisConfig) -> Result<Vec<FileEntry>> {
    let matcher = config.exclude_matcher();
    let mut entries = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            !(e.file_type().is_dir()
                && e.file_name()
                    .to_str()
                    .is_some_and(|name| SKIP_DIRS.contains(&name)))
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let rel_path = rel.to_string_lossy().replace('\\', "/");
        if rel_path.is_empty() || matcher.is_match(&rel_path) {
            continue;
        }

        if entry.file_type().is_dir() {
            entries.push(FileEntry::dir(rel_path));
        } else if entry.file_type().is_file() {
            let size = entry.metadata().ok().map(|m| m.len());
            let mut file = FileEntry {
                path: rel_path,
                kind: EntryKind::Blob,
                size,
                content: None,
            };
            let within_bound = size.map_or(true, |s| s <= config.max_content_bytes);
            if within_bound && config.is_content_file(file.file_name()) {
                match std::fs::read_to_string(entry.path()) {
                    Ok(content) => file.content = Some(content),
                    Err(e) => {
                        tracing::warn!(path = %file.path, error = %e, "failed to read content file");
                    }
                }
            }
            entries.push(file);
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_listing_uses_forward_slash_relative_paths() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "src/components/App.tsx", "export const App = 1;");
        write(tmp.path(), "README.md", "# demo");

        let entries = list_directory(tmp.path(), &AnalysisConfig::default()).unwrap();
        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&"src"));
        assert!(paths.contains(&"src/components/App.tsx"));
        assert!(paths.contains(&"README.md"));
    }

    #[test]
    fn test_skip_dirs_are_pruned() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "node_modules/react/index.js", "module.exports = {};");
        write(tmp.path(), "src/main.ts", "export {};");

        let entries = list_directory(tmp.path(), &AnalysisConfig::default()).unwrap();
        assert!(entries.iter().all(|e| !e.path.starts_with("node_modules")));
        assert!(entries.iter().any(|e| e.path == "src/main.ts"));
    }

    #[test]
    fn test_content_attached_only_for_allow_listed_files() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "package.json",
            r#"{"dependencies":{"react":"^18.0.0"}}"#,
        );
        write(tmp.path(), "src/main.ts", "export {};");

        let entries = list_directory(tmp.path(), &AnalysisConfig::default()).unwrap();
        let manifest = entries.iter().find(|e| e.path == "package.json").unwrap();
        assert!(manifest.content.as_deref().unwrap().contains("react"));

        let source = entries.iter().find(|e| e.path == "src/main.ts").unwrap();
        assert!(source.content.is_none());
        assert!(source.size.is_some());
    }

    #[test]
    fn test_config_exclude_patterns_apply() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "generated/out.ts", "export {};");
        write(tmp.path(), "src/main.ts", "export {};");

        let config = AnalysisConfig {
            exclude_patterns: vec!["generated/**".to_string()],
            ..AnalysisConfig::default()
        };
        let entries = list_directory(tmp.path(), &config).unwrap();
        assert!(entries.iter().all(|e| e.path != "generated/out.ts"));
        assert!(entries.iter().any(|e| e.path == "src/main.ts"));
    }

    #[test]
    fn test_listing_feeds_engine_end_to_end() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "package.json",
            r#"{"dependencies":{"react":"^18.0.0"}}"#,
        );
        write(tmp.path(), "src/App.tsx", "export const App = 1;");

        let entries = list_directory(tmp.path(), &AnalysisConfig::default()).unwrap();
        let analysis = repolens_core::analyze(&entries);
        assert!(analysis.profile.flags.react);
        assert_eq!(analysis.profile.framework, "React");
    }
}
