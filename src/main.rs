// repostats command line.
// Prints cached repository statistics and lists repositories.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use repostats::format::{signed_percent, smart_date};
use repostats::{
    Config, Credential, GitHubClient, RepoRef, RepoStats, RepoStatsService, StatsAggregator,
    TtlCache,
};

#[derive(Parser)]
#[command(name = "repostats")]
#[command(about = "GitHub repository statistics with a short-lived cache")]
#[command(version)]
struct Cli {
    #[arg(long, global = true, help = "GitHub token (defaults to GITHUB_TOKEN)")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show statistics for one repository.
    Stats {
        #[arg(help = "Repository as owner/name")]
        repo: String,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// List repositories: yours by last update, or another user's by stars.
    Repos {
        #[arg(long, short, help = "Filter repositories by name")]
        query: Option<String>,

        #[arg(long, short, help = "List this user's public repositories instead of yours")]
        user: Option<String>,

        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..), help = "Page of results")]
        page: u32,

        #[arg(long, default_value_t = 20, help = "Maximum repositories to show")]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("repostats=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load().context("loading configuration")?;
    let credential = match cli.token.as_deref() {
        Some(token) => Credential::new(token)?,
        None => Credential::from_env()?,
    };
    let client = GitHubClient::new(&config)?;

    match cli.command {
        Commands::Stats { repo, json } => {
            let repo: RepoRef = repo.parse()?;

            // Existence check: the only hosting failure surfaced to the user.
            let repository = client
                .get_repo(&repo, &credential)
                .await
                .with_context(|| format!("repository {} not found or not accessible", repo))?;

            let cache = Arc::new(TtlCache::new(config.cache_ttl()));
            let service = RepoStatsService::new(StatsAggregator::new(client, &config), cache);
            let stats = service.stats_for(&repo, &credential).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&repository.full_name, repository.description.as_deref(), &stats);
            }
        }
        Commands::Repos {
            query,
            user,
            page,
            limit,
        } => {
            let repos = match (query, user) {
                (Some(query), user) => {
                    let login = match user {
                        Some(login) => login,
                        None => client.get_current_user(&credential).await?.login,
                    };
                    client
                        .search_user_repos(&credential, &login, &query, limit)
                        .await?
                }
                (None, Some(login)) => {
                    client
                        .get_public_repos(&credential, &login, page, limit)
                        .await?
                }
                (None, None) => client.get_user_repos(&credential, page, limit).await?,
            };

            let now = Utc::now();
            for repo in repos {
                let pushed = repo
                    .pushed_at
                    .map(|at| smart_date(at, now))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<40} {:>6}* {:<12} {}",
                    repo.full_name,
                    repo.stargazers_count,
                    repo.language.as_deref().unwrap_or("-"),
                    pushed
                );
            }
        }
    }

    Ok(())
}

fn print_stats(name: &str, description: Option<&str>, stats: &RepoStats) {
    println!("{}", name);
    if let Some(description) = description {
        println!("  {}", description);
    }
    println!("  Files           {}", stats.total_files);
    println!("  Directories     {}", stats.directories);
    println!("  Lines of code   {}k", stats.lines_of_code);
    println!("  Contributors    {}", stats.contributors);
    println!(
        "  Weekly commits  {} ({} vs last week)",
        stats.weekly_commits,
        signed_percent(stats.commit_percentage_change)
    );
}
