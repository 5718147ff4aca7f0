use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use repolens_core::config::{Config, CONFIG_FILENAME};
use repolens_core::types::{CommitInfo, FileEntry};
use repolens_core::{analytics, analyze, tree};
use repolens_github::GithubClient;
use repolens_insights::InsightsClient;
use repolens_report::{diagram, json, text};

mod listing;

#[derive(Parser)]
#[command(name = "repolens")]
#[command(about = "Visualize a repository's inferred technology stack and architecture")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a local directory or a GitHub owner/repo and print a report
    Analyze {
        /// Local path or owner/repo reference
        target: String,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
        /// Config file path (defaults to .repolens.toml in the target root)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the inferred architecture diagram for a target
    Graph {
        /// Local path or owner/repo reference
        target: String,
        /// Output format: mermaid or json
        #[arg(long, default_value = "mermaid")]
        format: String,
        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the repository file tree with summary stats
    Tree {
        /// Local path or owner/repo reference
        target: String,
        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Request AI insights for a target (best effort)
    Insights {
        /// Local path or owner/repo reference
        target: String,
        /// API key; falls back to the OPENAI_API_KEY environment variable
        #[arg(long)]
        api_key: Option<String>,
        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Create a default .repolens.toml configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// One resolved analysis target: a local walk or a fetched snapshot.
#[derive(Debug)]
struct Target {
    name: String,
    entries: Vec<FileEntry>,
    commits: Vec<CommitInfo>,
    remote: bool,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            target,
            json,
            config,
        } => cmd_analyze(&target, json, config.as_deref()).await,
        Commands::Graph {
            target,
            format,
            config,
        } => cmd_graph(&target, &format, config.as_deref()).await,
        Commands::Tree { target, config } => cmd_tree(&target, config.as_deref()).await,
        Commands::Insights {
            target,
            api_key,
            config,
        } => cmd_insights(&target, api_key, config.as_deref()).await,
        Commands::Init { force } => cmd_init(force),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(2);
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn cmd_analyze(target: &str, as_json: bool, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(target, config_path)?;
    let target = load_target(target, &config).await?;
    let analysis = analyze(&target.entries);

    if as_json {
        let activity = analytics::commit_activity(&target.commits);
        let contributors = analytics::contributor_stats(&target.commits);
        let languages = analytics::language_distribution(&target.entries);
        let report = json::AnalysisReport {
            repository: &target.name,
            analysis: &analysis,
            analytics: target.remote.then_some(json::AnalyticsReport {
                commit_activity: &activity,
                contributors: &contributors,
                languages: &languages,
            }),
        };
        println!("{}", json::format_report(&report, false));
    } else {
        print!("{}", text::format_report(&target.name, &analysis));
        if target.remote {
            let activity = analytics::commit_activity(&target.commits);
            let contributors = analytics::contributor_stats(&target.commits);
            let languages = analytics::language_distribution(&target.entries);
            print!(
                "{}",
                text::format_analytics(&activity, &contributors, &languages)
            );
        }
    }
    Ok(())
}

async fn cmd_graph(target: &str, format: &str, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(target, config_path)?;
    let target = load_target(target, &config).await?;
    let analysis = analyze(&target.entries);

    match format {
        "mermaid" => print!("{}", diagram::generate(&analysis.graph)),
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&analysis.graph)
                .context("failed to serialize architecture graph")?
        ),
        other => anyhow::bail!("unknown graph format '{other}' (expected mermaid or json)"),
    }
    Ok(())
}

async fn cmd_tree(target: &str, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(target, config_path)?;
    let target = load_target(target, &config).await?;
    let nodes = tree::build_tree(&target.entries);
    let stats = tree::tree_stats(&target.entries);
    print!("{}", text::format_tree(&nodes, &stats));
    Ok(())
}

async fn cmd_insights(
    target: &str,
    api_key: Option<String>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(target, config_path)?;
    let api_key = api_key
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .context("no API key: pass --api-key or set OPENAI_API_KEY")?;

    let target = load_target(target, &config).await?;
    let analysis = analyze(&target.entries);

    let client = InsightsClient::new(&config.insights);
    match client
        .analyze(&api_key, &target.name, &analysis.profile, &target.entries)
        .await
    {
        Ok(insights) => print!("{}", text::format_insights(&insights)),
        Err(e) => {
            // Best effort by contract: the analysis itself is unaffected.
            println!("{}: {e}", "AI insights unavailable".yellow());
        }
    }
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_target = PathBuf::from(CONFIG_FILENAME);
    if config_target.exists() && !force {
        anyhow::bail!("{CONFIG_FILENAME} already exists. Use --force to overwrite.");
    }
    std::fs::write(&config_target, Config::default_toml())?;
    println!("Created {CONFIG_FILENAME} with default configuration.");
    Ok(())
}

fn load_config(target: &str, config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load(path),
        None => {
            let target_path = Path::new(target);
            if target_path.is_dir() {
                Ok(Config::load_or_default(target_path))
            } else {
                Ok(Config::load_or_default(Path::new(".")))
            }
        }
    }
}

/// Resolve the target string: an existing directory is walked locally,
/// an `owner/repo` reference is fetched from GitHub, anything else is a
/// usage error.
async fn load_target(target: &str, config: &Config) -> Result<Target> {
    let path = Path::new(target);
    if path.is_dir() {
        let entries = listing::list_directory(path, &config.analysis)?;
        let name = path
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| target.to_string());
        return Ok(Target {
            name,
            entries,
            commits: Vec::new(),
            remote: false,
        });
    }

    if target.contains('/') {
        let token = std::env::var("GITHUB_TOKEN").ok();
        let client = GithubClient::new(&config.github, &config.analysis, token);
        let snapshot = client
            .fetch_repository(target)
            .await
            .with_context(|| format!("failed to fetch repository '{target}'"))?;
        if snapshot.truncated {
            tracing::warn!("GitHub truncated the tree listing; analysis may be partial");
        }
        return Ok(Target {
            name: snapshot.full_name,
            entries: snapshot.entries,
            commits: snapshot.commits,
            remote: true,
        });
    }

    anyhow::bail!("'{target}' is neither a local directory nor an owner/repo reference")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_prefers_explicit_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("custom.toml");
        std::fs::write(&path, "[github]\ncommit_page_size = 25\n").unwrap();
        let config = load_config("whatever/ref", Some(&path)).unwrap();
        assert_eq!(config.github.commit_page_size, 25);
    }

    #[test]
    fn test_load_config_missing_explicit_path_fails() {
        assert!(load_config(".", Some(Path::new("/definitely/missing.toml"))).is_err());
    }

    #[tokio::test]
    async fn test_load_target_rejects_bare_word() {
        let config = Config::default();
        let err = load_target("notadir", &config).await.unwrap_err();
        assert!(err.to_string().contains("neither"));
    }

    #[tokio::test]
    async fn test_load_target_walks_local_directory() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("src")).unwrap();
        std::fs::write(tmp.path().join("src/App.tsx"), "export {};").unwrap();

        let config = Config::default();
        let target = load_target(tmp.path().to_str().unwrap(), &config)
            .await
            .unwrap();
        assert!(!target.remote);
        assert!(target.commits.is_empty());
        assert!(target.entries.iter().any(|e| e.path == "src/App.tsx"));
    }

    #[test]
    fn test_analysis_is_send() {
        // The engine output crosses await points in the command handlers.
        fn assert_send<T: Send>() {}
        assert_send::<repolens_core::Analysis>();
    }
}
