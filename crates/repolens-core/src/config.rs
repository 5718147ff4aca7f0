use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration filename looked up in the analyzed project root.
pub const CONFIG_FILENAME: &str = ".repolens.toml";

/// Top-level configuration from `.repolens.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub insights: InsightsConfig,
}

/// Listing and classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Paths excluded from local directory walks.
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
    /// Filenames whose raw text may be attached to a `FileEntry`. Content
    /// is never read for files outside this allow-list.
    #[serde(default = "default_content_files")]
    pub content_files: Vec<String>,
    /// Upper bound on attached content size.
    #[serde(default = "default_max_content_bytes")]
    pub max_content_bytes: u64,
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        ".git/**".to_string(),
        "node_modules/**".to_string(),
        "dist/**".to_string(),
        "build/**".to_string(),
        "target/**".to_string(),
        ".next/**".to_string(),
        "vendor/**".to_string(),
    ]
}

fn default_content_files() -> Vec<String> {
    vec![
        "package.json".to_string(),
        "app.py".to_string(),
        "main.py".to_string(),
        "app.js".to_string(),
        "server.js".to_string(),
        "index.js".to_string(),
        "manage.py".to_string(),
    ]
}

fn default_max_content_bytes() -> u64 {
    256 * 1024
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            exclude_patterns: default_exclude_patterns(),
            content_files: default_content_files(),
            max_content_bytes: default_max_content_bytes(),
        }
    }
}

impl AnalysisConfig {
    /// Compile the exclude patterns into a matcher. Invalid patterns are
    /// skipped rather than failing the run.
    pub fn exclude_matcher(&self) -> GlobSet {
        build_globset(&self.exclude_patterns)
    }

    /// Whether content may be attached for this final path segment.
    pub fn is_content_file(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.content_files.iter().any(|f| f.to_lowercase() == lower)
    }
}

/// GitHub REST collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_github_api_base")]
    pub api_base: String,
    /// Commits fetched for the peripheral analytics.
    #[serde(default = "default_commit_page_size")]
    pub commit_page_size: u32,
}

fn default_github_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_commit_page_size() -> u32 {
    100
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: default_github_api_base(),
            commit_page_size: default_commit_page_size(),
        }
    }
}

/// Optional AI-insights collaborator settings. The credential itself comes
/// from the environment, never from this file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsConfig {
    #[serde(default = "default_insights_api_base")]
    pub api_base: String,
    #[serde(default = "default_insights_model")]
    pub model: String,
    #[serde(default = "default_insights_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_insights_temperature")]
    pub temperature: f64,
}

fn default_insights_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_insights_model() -> String {
    "gpt-4.1-2025-04-14".to_string()
}

fn default_insights_max_tokens() -> u32 {
    2000
}

fn default_insights_temperature() -> f64 {
    0.3
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            api_base: default_insights_api_base(),
            model: default_insights_model(),
            max_tokens: default_insights_max_tokens(),
            temperature: default_insights_temperature(),
        }
    }
}

fn build_globset(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        if let Ok(glob) = Glob::new(pattern) {
            builder.add(glob);
        }
    }
    builder
        .build()
        .unwrap_or_else(|_| GlobSetBuilder::new().build().unwrap())
}

impl Config {
    /// Load configuration from an explicit path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config at {}", path.display()))
    }

    /// Load `.repolens.toml` from the project root, or defaults when absent
    /// or unreadable.
    pub fn load_or_default(project_path: &Path) -> Self {
        let candidate = project_path.join(CONFIG_FILENAME);
        if candidate.exists() {
            Self::load(&candidate).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Default configuration rendered as TOML, for `init`.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Config::default())
            .expect("default config should serialize")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config
            .analysis
            .exclude_patterns
            .contains(&"node_modules/**".to_string()));
        assert!(config.analysis.is_content_file("package.json"));
        assert!(config.analysis.is_content_file("PACKAGE.JSON"));
        assert!(!config.analysis.is_content_file("main.rs"));
        assert_eq!(config.github.api_base, "https://api.github.com");
        assert_eq!(config.insights.max_tokens, 2000);
    }

    #[test]
    fn test_exclude_matcher() {
        let matcher = AnalysisConfig::default().exclude_matcher();
        assert!(matcher.is_match("node_modules/react/index.js"));
        assert!(matcher.is_match(".git/HEAD"));
        assert!(!matcher.is_match("src/main.ts"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [insights]
            model = "gpt-4o-mini"
            "#,
        )
        .unwrap();
        assert_eq!(config.insights.model, "gpt-4o-mini");
        assert_eq!(config.insights.max_tokens, 2000);
        assert!(!config.analysis.exclude_patterns.is_empty());
    }

    #[test]
    fn test_default_toml_round_trips() {
        let rendered = Config::default_toml();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.github.api_base, Config::default().github.api_base);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(tmp.path());
        assert_eq!(config.github.commit_page_size, 100);
    }

    #[test]
    fn test_load_or_default_reads_file() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[github]\napi_base = \"https://ghe.example.com/api/v3\"\n",
        )
        .unwrap();
        let config = Config::load_or_default(tmp.path());
        assert_eq!(config.github.api_base, "https://ghe.example.com/api/v3");
    }
}
