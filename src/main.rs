mod aggregate;
mod config;
mod github;
mod pipeline;
mod report;

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, HourZone};
use crate::github::HttpClient;
use crate::pipeline::Pipeline;
use crate::report::TerminalRenderer;

/// gh-profile-stats: summarize a GitHub user's public profile, top
/// repositories, language mix, and the hours they commit at.
#[derive(Parser, Debug)]
#[command(name = "gh-profile-stats", version, about)]
struct Cli {
    /// GitHub username (e.g., torvalds)
    username: String,

    /// Optional output file path for a markdown report
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file to use instead of ./.gh-profile-stats.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bucket commit hours in UTC instead of local time
    #[arg(long)]
    utc: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let _main_span = info_span!("profile_stats", username = %cli.username).entered();

    info!("loading configuration");
    let mut config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path)?.with_env_overrides(),
        None => Config::load()?,
    };
    if cli.utc {
        config.display.hour_zone = HourZone::Utc;
    }
    debug!(base_url = %config.api.base_url, limits = ?config.limits, "configuration loaded");

    let client = HttpClient::new(&config.api)?;
    let pipeline = Pipeline::new(client, &config);
    let mut renderer = TerminalRenderer::new();

    info!("running query");
    let outcome = pipeline.run_query(&cli.username, &mut renderer).await;

    if let Some(path) = cli.output.as_deref() {
        report::write_markdown_report(renderer.view(), path)?;
        info!(path = %path.display(), "wrote markdown report");
    }

    debug!(complete = renderer.view().is_complete(), "query finished");
    // The renderer has already shown the error message.
    let Ok(dashboard) = outcome else {
        std::process::exit(1);
    };
    info!(
        languages = dashboard.derived.languages.len(),
        commits = dashboard.derived.commit_hours.total(),
        "done"
    );
    Ok(())
}
