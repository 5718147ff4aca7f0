use chrono::{DateTime, Utc};
use serde::Deserialize;

use repolens_core::types::{CommitInfo, EntryKind, FileEntry};

/// `GET /repos/{owner}/{repo}`, reduced to the fields the dashboard needs.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoResponse {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub default_branch: String,
}

/// `GET /repos/{owner}/{repo}/git/trees/{ref}?recursive=1`.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeResponse {
    pub sha: String,
    #[serde(default)]
    pub truncated: bool,
    pub tree: Vec<TreeItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeItem {
    #[serde(default)]
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub size: Option<u64>,
}

/// One element of `GET /repos/{owner}/{repo}/commits`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitListItem {
    pub sha: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub message: String,
    #[serde(default)]
    pub author: Option<CommitSignature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitSignature {
    #[serde(default)]
    pub name: Option<String>,
    pub date: DateTime<Utc>,
}

/// Map raw tree items into engine entries. Empty paths and non-blob,
/// non-tree kinds (submodule commits) are dropped here so the engine never
/// sees them; separators are normalized to forward slashes.
pub fn normalize_tree(items: Vec<TreeItem>) -> Vec<FileEntry> {
    items
        .into_iter()
        .filter_map(|item| {
            if item.path.is_empty() {
                return None;
            }
            let kind = match item.kind.as_str() {
                "blob" => EntryKind::Blob,
                "tree" => EntryKind::Tree,
                _ => return None,
            };
            Some(FileEntry {
                path: item.path.replace('\\', "/"),
                kind,
                size: item.size,
                content: None,
            })
        })
        .collect()
}

/// Map raw commit items into engine commits. Commits without an author
/// signature carry no timestamp and are dropped; a signature without a
/// name falls back to "unknown".
pub fn normalize_commits(items: Vec<CommitListItem>) -> Vec<CommitInfo> {
    items
        .into_iter()
        .filter_map(|item| {
            let author = item.commit.author?;
            Some(CommitInfo {
                sha: item.sha,
                author: author.name.unwrap_or_else(|| "unknown".to_string()),
                timestamp: author.date,
                message: item.commit.message,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_response_deserializes() {
        let json = r#"{
            "sha": "abc123",
            "truncated": false,
            "tree": [
                {"path": "src/App.tsx", "type": "blob", "size": 1024},
                {"path": "src", "type": "tree"},
                {"path": "vendored", "type": "commit"}
            ]
        }"#;
        let response: TreeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.tree.len(), 3);

        let entries = normalize_tree(response.tree);
        assert_eq!(entries.len(), 2, "submodule commit dropped");
        assert_eq!(entries[0].path, "src/App.tsx");
        assert_eq!(entries[0].kind, EntryKind::Blob);
        assert_eq!(entries[0].size, Some(1024));
        assert_eq!(entries[1].kind, EntryKind::Tree);
    }

    #[test]
    fn test_normalize_tree_drops_empty_paths_and_fixes_separators() {
        let items = vec![
            TreeItem {
                path: String::new(),
                kind: "blob".to_string(),
                size: None,
            },
            TreeItem {
                path: "src\\win\\path.ts".to_string(),
                kind: "blob".to_string(),
                size: None,
            },
        ];
        let entries = normalize_tree(items);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "src/win/path.ts");
    }

    #[test]
    fn test_commit_list_deserializes_and_normalizes() {
        let json = r#"[
            {
                "sha": "aaa",
                "commit": {
                    "message": "feat: add dashboard",
                    "author": {"name": "Alice", "date": "2024-01-08T12:00:00Z"}
                }
            },
            {
                "sha": "bbb",
                "commit": {"message": "orphan", "author": null}
            },
            {
                "sha": "ccc",
                "commit": {
                    "message": "unnamed",
                    "author": {"name": null, "date": "2024-01-09T09:30:00Z"}
                }
            }
        ]"#;
        let items: Vec<CommitListItem> = serde_json::from_str(json).unwrap();
        let commits = normalize_commits(items);
        assert_eq!(commits.len(), 2, "authorless commit dropped");
        assert_eq!(commits[0].author, "Alice");
        assert_eq!(commits[1].author, "unknown");
        assert_eq!(commits[1].sha, "ccc");
    }

    #[test]
    fn test_repo_response_optional_description() {
        let json = r#"{"name": "demo", "full_name": "acme/demo", "default_branch": "main"}"#;
        let repo: RepoResponse = serde_json::from_str(json).unwrap();
        assert_eq!(repo.name, "demo");
        assert!(repo.description.is_none());
    }
}
