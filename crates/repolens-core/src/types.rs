use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One file or directory in a repository listing.
///
/// Paths are forward-slash separated and relative to the repository root.
/// `content` is populated only for a small allow-list of manifest and config
/// files; arbitrary source files never carry content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl FileEntry {
    /// A file entry without size or content.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Blob,
            size: None,
            content: None,
        }
    }

    /// A file entry carrying raw text content.
    pub fn file_with_content(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Blob,
            size: None,
            content: Some(content.into()),
        }
    }

    /// A directory entry. Directories are grouping markers only.
    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Tree,
            size: None,
            content: None,
        }
    }

    /// Final path segment, e.g. `vite.config.ts` for `web/vite.config.ts`.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Extension after the last dot of the final segment, lowercased rules
    /// are applied by callers; dotfiles like `.eslintrc` have no extension.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(idx) if idx > 0 && idx + 1 < name.len() => Some(&name[idx + 1..]),
            _ => None,
        }
    }
}

/// File vs. directory in the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Blob,
    Tree,
}

/// A commit from the hosting provider's history API, used by the peripheral
/// analytics only; the core engine never reads commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub sha: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// Architectural tier used to group and connect diagram nodes.
/// Declaration order is the rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    User,
    Presentation,
    State,
    Api,
    Business,
    Data,
    Infrastructure,
    Tooling,
}

impl Layer {
    /// All layers in their fixed declaration order.
    pub const ALL: [Layer; 8] = [
        Layer::User,
        Layer::Presentation,
        Layer::State,
        Layer::Api,
        Layer::Business,
        Layer::Data,
        Layer::Infrastructure,
        Layer::Tooling,
    ];

    /// Human-readable title used in diagrams, e.g. "Business Logic".
    pub fn title(&self) -> &'static str {
        match self {
            Layer::User => "Users",
            Layer::Presentation => "Presentation",
            Layer::State => "State",
            Layer::Api => "API",
            Layer::Business => "Business Logic",
            Layer::Data => "Data",
            Layer::Infrastructure => "Infrastructure",
            Layer::Tooling => "Tooling",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::User => write!(f, "user"),
            Layer::Presentation => write!(f, "presentation"),
            Layer::State => write!(f, "state"),
            Layer::Api => write!(f, "api"),
            Layer::Business => write!(f, "business"),
            Layer::Data => write!(f, "data"),
            Layer::Infrastructure => write!(f, "infrastructure"),
            Layer::Tooling => write!(f, "tooling"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_and_extension() {
        let entry = FileEntry::file("src/components/App.tsx");
        assert_eq!(entry.file_name(), "App.tsx");
        assert_eq!(entry.extension(), Some("tsx"));
    }

    #[test]
    fn test_dotfile_has_no_extension() {
        let entry = FileEntry::file(".eslintrc");
        assert_eq!(entry.file_name(), ".eslintrc");
        assert_eq!(entry.extension(), None);
    }

    #[test]
    fn test_root_level_file_name() {
        let entry = FileEntry::file("package.json");
        assert_eq!(entry.file_name(), "package.json");
        assert_eq!(entry.extension(), Some("json"));
    }

    #[test]
    fn test_trailing_dot_has_no_extension() {
        let entry = FileEntry::file("weird.");
        assert_eq!(entry.extension(), None);
    }

    #[test]
    fn test_layer_display() {
        assert_eq!(Layer::Presentation.to_string(), "presentation");
        assert_eq!(Layer::Data.to_string(), "data");
    }

    #[test]
    fn test_layer_order_is_fixed() {
        assert_eq!(Layer::ALL[0], Layer::User);
        assert_eq!(Layer::ALL[7], Layer::Tooling);
    }
}
