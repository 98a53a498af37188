mod logging;
mod render;

use clap::{Parser, Subcommand};
use releasefeed_config::{default_config_path, FeedConfig};
use releasefeed_core::{QueryState, ReleaseQuery, Releases};
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "releasefeed")]
#[command(about = "Show the changelog of a GitHub-hosted tool")]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Repository owner
    #[arg(long)]
    owner: Option<String>,

    /// Repository name
    #[arg(long)]
    repo: Option<String>,

    /// Base URL of the GitHub REST API
    #[arg(long)]
    api_url: Option<String>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all published releases, newest first
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        /// Show at most this many releases
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show the latest release
    Latest {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration
    Config {
        /// Write it to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn load_config(cli: &Cli) -> Result<FeedConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => FeedConfig::load(path)?,
        None => match default_config_path() {
            Ok(path) => FeedConfig::load_or_default(&path)?,
            Err(e) => {
                tracing::debug!(error = %e, "no config directory, using defaults");
                FeedConfig::default()
            }
        },
    };
    if let Some(owner) = &cli.owner {
        config.owner = owner.clone();
    }
    if let Some(repo) = &cli.repo {
        config.repo = repo.clone();
    }
    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.clone();
    }
    Ok(config)
}

async fn fetch_releases(config: &FeedConfig) -> Result<Releases, Box<dyn Error>> {
    let query = ReleaseQuery::from_config(config);
    match query.fetch().await {
        QueryState::Success(releases) => Ok(releases),
        QueryState::Error { message } => Err(message.into()),
        state => Err(format!("release query did not complete: {:?}", state).into()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::List { json, limit } => {
            let releases = fetch_releases(&config).await?;
            let shown = &releases[..limit.unwrap_or(releases.len()).min(releases.len())];
            if json {
                println!("{}", serde_json::to_string_pretty(shown)?);
            } else {
                print!("{}", render::render_changelog(shown));
            }
        }
        Commands::Latest { json } => {
            let releases = fetch_releases(&config).await?;
            match releases.iter().find(|r| r.is_latest) {
                Some(release) if json => println!("{}", serde_json::to_string_pretty(release)?),
                Some(release) => print!("{}", render::render_release(release)),
                None => println!("No releases found"),
            }
        }
        Commands::Config { output } => {
            if let Some(path) = output {
                config.save(&path)?;
                println!("Config written to {}", path.display());
            } else {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "releasefeed",
            "--config",
            "/nonexistent/releasefeed.json",
            "list",
        ]);
        assert!(load_config(&cli).is_err());

        let cli = Cli::parse_from([
            "releasefeed",
            "--owner",
            "octo",
            "--api-url",
            "http://127.0.0.1:1",
            "latest",
            "--json",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.owner, "octo");
        assert_eq!(config.api_url, "http://127.0.0.1:1");
        assert!(matches!(cli.command, Commands::Latest { json: true }));
    }
}
