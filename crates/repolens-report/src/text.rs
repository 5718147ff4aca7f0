use colored::Colorize;

use repolens_core::analytics::{ContributorStats, DailyActivity, LanguageShare};
use repolens_core::tree::{TreeNode, TreeStats};
use repolens_core::types::EntryKind;
use repolens_core::Analysis;
use repolens_insights::RepoInsights;

/// Format a full analysis for terminal output.
pub fn format_report(repo_name: &str, analysis: &Analysis) -> String {
    let profile = &analysis.profile;
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", "Repolens - Repository Analysis".bold()));
    out.push_str(&format!("{}\n\n", "=".repeat(40)));

    out.push_str(&format!("{}: {repo_name}\n", "Repository".bold()));
    out.push_str(&format!("{}: {}\n", "Framework".bold(), profile.framework));
    out.push_str(&format!(
        "{}: {}\n",
        "Architecture".bold(),
        profile.architecture_style
    ));
    out.push_str(&format!(
        "{}: {} ({} scale)\n",
        "Complexity".bold(),
        profile.complexity,
        profile.scale
    ));

    out.push_str(&format!("\n{}\n{}\n", "Files".bold(), "-".repeat(40)));
    let counts = &profile.counts;
    out.push_str(&format!("  Total:      {}\n", counts.total));
    out.push_str(&format!("  Components: {}\n", counts.components));
    out.push_str(&format!("  Services:   {}\n", counts.services));
    out.push_str(&format!("  Configs:    {}\n", counts.configs));
    out.push_str(&format!("  Styles:     {}\n", counts.styles));
    out.push_str(&format!("  Assets:     {}\n", counts.assets));
    out.push_str(&format!("  Docs:       {}\n", counts.docs));

    let technologies = profile.flags.technologies();
    if technologies.is_empty() {
        out.push_str(&format!(
            "\n{}\n",
            "No technologies detected - minimal stack.".yellow()
        ));
    } else {
        out.push_str(&format!(
            "\n{}\n{}\n",
            "Detected Technologies".bold(),
            "-".repeat(40)
        ));
        out.push_str(&format!("  {}\n", technologies.join(", ")));
    }

    if !profile.patterns.is_empty() {
        out.push_str(&format!("\n{}\n{}\n", "Patterns".bold(), "-".repeat(40)));
        for pattern in &profile.patterns {
            out.push_str(&format!("  {} {pattern}\n", "*".green()));
        }
    }

    out.push_str(&format!(
        "\n{}: {} nodes, {} edges\n",
        "Architecture Graph".bold(),
        analysis.graph.nodes.len(),
        analysis.graph.edges.len()
    ));
    for node in &analysis.graph.nodes {
        out.push_str(&format!("  [{}] {}\n", node.layer, node.label));
    }

    out.push('\n');
    out
}

/// Format the peripheral commit/contributor/language analytics.
pub fn format_analytics(
    activity: &[DailyActivity],
    contributors: &[ContributorStats],
    languages: &[LanguageShare],
) -> String {
    let mut out = String::new();

    if !activity.is_empty() {
        out.push_str(&format!(
            "{}\n{}\n",
            "Commit Activity".bold(),
            "-".repeat(40)
        ));
        for day in activity {
            out.push_str(&format!("  {}  {}\n", day.date, "#".repeat(day.commits.min(40))));
        }
        out.push('\n');
    }

    if !contributors.is_empty() {
        out.push_str(&format!(
            "{}\n{}\n",
            "Top Contributors".bold(),
            "-".repeat(40)
        ));
        for contributor in contributors.iter().take(10) {
            out.push_str(&format!(
                "  {:<24} {} commits\n",
                contributor.name, contributor.commits
            ));
        }
        out.push('\n');
    }

    if !languages.is_empty() {
        out.push_str(&format!(
            "{}\n{}\n",
            "Language Distribution".bold(),
            "-".repeat(40)
        ));
        for share in languages {
            out.push_str(&format!(
                "  {:<12} {:>5.1}%  ({} files)\n",
                share.language, share.percent, share.files
            ));
        }
        out.push('\n');
    }

    out
}

/// Format the nested file tree with its summary stats.
pub fn format_tree(nodes: &[TreeNode], stats: &TreeStats) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}: {} folders, {} files\n",
        "Structure".bold(),
        stats.folders,
        stats.files
    ));
    if !stats.extensions.is_empty() {
        out.push_str(&format!(
            "{}: {}\n",
            "Extensions".bold(),
            stats.extensions.join(", ")
        ));
    }
    out.push('\n');
    render_tree_nodes(&mut out, nodes, 0);
    out
}

fn render_tree_nodes(out: &mut String, nodes: &[TreeNode], depth: usize) {
    for node in nodes {
        let indent = "  ".repeat(depth + 1);
        match node.kind {
            EntryKind::Tree => {
                out.push_str(&format!("{indent}{}/\n", node.name));
                render_tree_nodes(out, &node.children, depth + 1);
            }
            EntryKind::Blob => out.push_str(&format!("{indent}{}\n", node.name)),
        }
    }
}

/// Format AI commentary for terminal output.
pub fn format_insights(insights: &RepoInsights) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", "AI Insights".bold()));
    out.push_str(&format!("{}\n", "=".repeat(40)));
    out.push_str(&format!("\n{}\n", insights.architecture_insights));
    out.push_str(&format!(
        "\n{}: {:.1}/10\n",
        "Code Quality Score".bold(),
        insights.code_quality_score
    ));

    if !insights.technology_recommendations.is_empty() {
        out.push_str(&format!("\n{}\n", "Recommendations".bold()));
        for item in &insights.technology_recommendations {
            out.push_str(&format!("  {} {item}\n", "*".green()));
        }
    }
    if !insights.security_concerns.is_empty() {
        out.push_str(&format!("\n{}\n", "Security Concerns".bold()));
        for item in &insights.security_concerns {
            out.push_str(&format!("  {} {item}\n", "!".red()));
        }
    }
    if !insights.performance_optimizations.is_empty() {
        out.push_str(&format!("\n{}\n", "Performance".bold()));
        for item in &insights.performance_optimizations {
            out.push_str(&format!("  {} {item}\n", "*".cyan()));
        }
    }

    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use repolens_core::{analyze, FileEntry};

    #[test]
    fn test_format_report_sections() {
        let entries = vec![
            FileEntry::file("src/App.tsx"),
            FileEntry::file("src/api/users.ts"),
            FileEntry::file("prisma/schema.prisma"),
        ];
        let analysis = analyze(&entries);
        let report = format_report("acme/demo", &analysis);

        assert!(report.contains("acme/demo"));
        assert!(report.contains("Framework"));
        assert!(report.contains("React"));
        assert!(report.contains("full-stack"));
        assert!(report.contains("Architecture Graph"));
    }

    #[test]
    fn test_empty_profile_renders_minimal_stack() {
        let analysis = analyze(&[]);
        let report = format_report("empty/repo", &analysis);
        assert!(report.contains("minimal stack"));
        assert!(report.contains("End Users"));
    }

    #[test]
    fn test_format_analytics_handles_empty_input() {
        assert!(format_analytics(&[], &[], &[]).is_empty());
    }

    #[test]
    fn test_format_analytics_sections() {
        use chrono::NaiveDate;
        let activity = vec![DailyActivity {
            date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            commits: 3,
        }];
        let contributors = vec![ContributorStats {
            name: "alice".to_string(),
            commits: 12,
        }];
        let languages = vec![LanguageShare {
            language: "TypeScript".to_string(),
            files: 3,
            percent: 75.0,
        }];
        let out = format_analytics(&activity, &contributors, &languages);
        assert!(out.contains("Commit Activity"));
        assert!(out.contains("alice"));
        assert!(out.contains("TypeScript"));
        assert!(out.contains("75.0%"));
    }

    #[test]
    fn test_format_tree_renders_nested_structure() {
        use repolens_core::tree;
        let entries = vec![
            FileEntry::file("src/components/App.tsx"),
            FileEntry::file("README.md"),
        ];
        let nodes = tree::build_tree(&entries);
        let stats = tree::tree_stats(&entries);
        let out = format_tree(&nodes, &stats);
        assert!(out.contains("2 files"));
        assert!(out.contains("src/"));
        assert!(out.contains("App.tsx"));
        assert!(out.contains("md, tsx"));
    }

    #[test]
    fn test_format_insights_sections() {
        let insights = RepoInsights {
            architecture_insights: "Component-driven SPA.".to_string(),
            technology_recommendations: vec!["Add a router".to_string()],
            code_quality_score: 7.5,
            security_concerns: vec![],
            performance_optimizations: vec![],
        };
        let out = format_insights(&insights);
        assert!(out.contains("AI Insights"));
        assert!(out.contains("7.5/10"));
        assert!(out.contains("Add a router"));
        assert!(!out.contains("Security Concerns"));
    }
}
