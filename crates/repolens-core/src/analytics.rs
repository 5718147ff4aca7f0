use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{CommitInfo, EntryKind, FileEntry};

/// Commits per calendar day (UTC), date-ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub commits: usize,
}

/// Commit count per author, most active first. Line-level churn is not
/// derivable from the commit listing and is deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorStats {
    pub name: String,
    pub commits: usize,
}

/// Share of recognized source files per language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub language: String,
    pub files: usize,
    pub percent: f64,
}

/// Extension to display-language table for the distribution chart.
const LANGUAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("ts", "TypeScript"),
    ("tsx", "TypeScript"),
    ("js", "JavaScript"),
    ("jsx", "JavaScript"),
    ("mjs", "JavaScript"),
    ("css", "CSS"),
    ("scss", "CSS"),
    ("sass", "CSS"),
    ("html", "HTML"),
    ("py", "Python"),
    ("rs", "Rust"),
    ("go", "Go"),
    ("java", "Java"),
    ("rb", "Ruby"),
    ("vue", "Vue"),
    ("svelte", "Svelte"),
];

pub fn commit_activity(commits: &[CommitInfo]) -> Vec<DailyActivity> {
    let mut by_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for commit in commits {
        *by_day.entry(commit.timestamp.date_naive()).or_insert(0) += 1;
    }
    by_day
        .into_iter()
        .map(|(date, commits)| DailyActivity { date, commits })
        .collect()
}

pub fn contributor_stats(commits: &[CommitInfo]) -> Vec<ContributorStats> {
    let mut by_author: BTreeMap<&str, usize> = BTreeMap::new();
    for commit in commits {
        *by_author.entry(commit.author.as_str()).or_insert(0) += 1;
    }
    let mut stats: Vec<ContributorStats> = by_author
        .into_iter()
        .map(|(name, commits)| ContributorStats {
            name: name.to_string(),
            commits,
        })
        .collect();
    stats.sort_by(|a, b| b.commits.cmp(&a.commits).then_with(|| a.name.cmp(&b.name)));
    stats
}

/// File counts and percentages per recognized language, largest share
/// first. Files with unrecognized extensions are excluded from the total.
pub fn language_distribution(entries: &[FileEntry]) -> Vec<LanguageShare> {
    let mut by_language: BTreeMap<&'static str, usize> = BTreeMap::new();
    for entry in entries {
        if entry.kind != EntryKind::Blob {
            continue;
        }
        let Some(ext) = entry.extension() else { continue };
        let ext = ext.to_lowercase();
        if let Some(&(_, language)) = LANGUAGE_EXTENSIONS.iter().find(|(e, _)| *e == ext) {
            *by_language.entry(language).or_insert(0) += 1;
        }
    }

    let total: usize = by_language.values().sum();
    let mut shares: Vec<LanguageShare> = by_language
        .into_iter()
        .map(|(language, files)| LanguageShare {
            language: language.to_string(),
            files,
            percent: if total == 0 {
                0.0
            } else {
                (files as f64 / total as f64 * 1000.0).round() / 10.0
            },
        })
        .collect();
    shares.sort_by(|a, b| {
        b.files
            .cmp(&a.files)
            .then_with(|| a.language.cmp(&b.language))
    });
    shares
}
