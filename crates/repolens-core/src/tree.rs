use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{EntryKind, FileEntry};

/// One node of the nested repository tree derived from the flat listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

/// Folder/file totals and the distinct short extensions present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    pub folders: usize,
    pub files: usize,
    pub extensions: Vec<String>,
}

#[derive(Default)]
struct DirBuilder {
    dirs: BTreeMap<String, DirBuilder>,
    files: BTreeMap<String, Option<String>>,
}

impl DirBuilder {
    fn insert(&mut self, segments: &[&str], is_file: bool) {
        let Some((head, rest)) = segments.split_first() else {
            return;
        };
        if rest.is_empty() {
            if is_file {
                let extension = head
                    .rfind('.')
                    .filter(|&idx| idx > 0 && idx + 1 < head.len())
                    .map(|idx| head[idx + 1..].to_string());
                self.files.insert((*head).to_string(), extension);
            } else {
                self.dirs.entry((*head).to_string()).or_default();
            }
        } else {
            self.dirs.entry((*head).to_string()).or_default().insert(rest, is_file);
        }
    }

    fn into_nodes(self, prefix: &str) -> Vec<TreeNode> {
        let mut nodes = Vec::new();
        // Folders first, then files, each alphabetical via BTreeMap order.
        for (name, dir) in self.dirs {
            let path = join(prefix, &name);
            let children = dir.into_nodes(&path);
            nodes.push(TreeNode {
                name,
                path,
                kind: EntryKind::Tree,
                extension: None,
                children,
            });
        }
        for (name, extension) in self.files {
            let path = join(prefix, &name);
            nodes.push(TreeNode {
                name,
                path,
                kind: EntryKind::Blob,
                extension,
                children: Vec::new(),
            });
        }
        nodes
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

/// Build a nested tree from the flat listing. Intermediate directories are
/// created implicitly; ordering is folders-before-files, alphabetical.
pub fn build_tree(entries: &[FileEntry]) -> Vec<TreeNode> {
    let mut root = DirBuilder::default();
    for entry in entries {
        let segments: Vec<&str> = entry.path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            continue;
        }
        // Every non-final segment is an implicit directory.
        root.insert(&segments, entry.kind == EntryKind::Blob);
    }
    root.into_nodes("")
}

/// Folder/file totals plus distinct extensions (short ones only, matching
/// the badge display convention).
pub fn tree_stats(entries: &[FileEntry]) -> TreeStats {
    let mut folders = 0;
    let mut files = 0;
    let mut extensions: Vec<String> = Vec::new();

    for entry in entries {
        match entry.kind {
            EntryKind::Tree => folders += 1,
            EntryKind::Blob => {
                files += 1;
                if let Some(ext) = entry.extension() {
                    let ext = ext.to_lowercase();
                    if ext.len() < 5 && !extensions.contains(&ext) {
                        extensions.push(ext);
                    }
                }
            }
        }
    }

    extensions.sort();
    TreeStats {
        folders,
        files,
        extensions,
    }
}
