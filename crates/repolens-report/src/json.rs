use serde::Serialize;

use repolens_core::analytics::{ContributorStats, DailyActivity, LanguageShare};
use repolens_core::Analysis;

/// Wrapper adding the repository identity to the engine output.
#[derive(Debug, Serialize)]
pub struct AnalysisReport<'a> {
    pub repository: &'a str,
    #[serde(flatten)]
    pub analysis: &'a Analysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics: Option<AnalyticsReport<'a>>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsReport<'a> {
    pub commit_activity: &'a [DailyActivity],
    pub contributors: &'a [ContributorStats],
    pub languages: &'a [LanguageShare],
}

/// Format an analysis report as JSON.
pub fn format_report(report: &AnalysisReport<'_>, compact: bool) -> String {
    if compact {
        serde_json::to_string(report).expect("AnalysisReport should be serializable")
    } else {
        serde_json::to_string_pretty(report).expect("AnalysisReport should be serializable")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repolens_core::{analyze, FileEntry};

    fn sample_analysis() -> Analysis {
        analyze(&[
            FileEntry::file("src/App.tsx"),
            FileEntry::file("src/api/users.ts"),
        ])
    }

    #[test]
    fn test_format_report_valid_json() {
        let analysis = sample_analysis();
        let report = AnalysisReport {
            repository: "acme/demo",
            analysis: &analysis,
            analytics: None,
        };
        let json = format_report(&report, false);
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("should be valid JSON");
        assert_eq!(parsed["repository"], "acme/demo");
        assert!(parsed.get("profile").is_some());
        assert!(parsed.get("graph").is_some());
        assert!(parsed.get("analytics").is_none());
        assert_eq!(parsed["profile"]["framework"], "React");
    }

    #[test]
    fn test_compact_is_single_line() {
        let analysis = sample_analysis();
        let report = AnalysisReport {
            repository: "acme/demo",
            analysis: &analysis,
            analytics: None,
        };
        let json = format_report(&report, true);
        assert!(!json.contains('\n'), "compact JSON should be single line");
        let _: serde_json::Value = serde_json::from_str(&json).expect("should be valid JSON");
    }

    #[test]
    fn test_analytics_section_serializes() {
        let analysis = sample_analysis();
        let languages = vec![LanguageShare {
            language: "TypeScript".to_string(),
            files: 2,
            percent: 100.0,
        }];
        let report = AnalysisReport {
            repository: "acme/demo",
            analysis: &analysis,
            analytics: Some(AnalyticsReport {
                commit_activity: &[],
                contributors: &[],
                languages: &languages,
            }),
        };
        let json = format_report(&report, false);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["analytics"]["languages"][0]["language"], "TypeScript");
    }
}
