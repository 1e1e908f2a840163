use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use eoltrack::config::{SourcesConfig, FETCH_TIMEOUT_SECS};
use eoltrack::fetch::aggregator::Aggregator;
use eoltrack::render;

#[derive(Parser)]
#[command(name = "eoltrack")]
#[command(version, about = "Look up EOL dates, registry metadata and advisories for a software name")]
struct Cli {
    /// Software name to look up (e.g. python, nodejs, react)
    software: String,

    /// Print the bundle as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Per-source fetch timeout in seconds
    #[arg(long, default_value_t = FETCH_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Skip a source (endoflife, github, npm, pypi, dockerhub, rubygems,
    /// maven, os_package); may be given multiple times
    #[arg(long = "skip", value_name = "SOURCE")]
    skip: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = SourcesConfig::default();
    for name in &cli.skip {
        if !config.disable(name) {
            anyhow::bail!("unknown source: {name}");
        }
    }

    let aggregator = Aggregator::new(&config, Duration::from_secs(cli.timeout_secs));
    let bundle = aggregator.lookup(&cli.software).await?;

    if cli.json {
        println!("{}", render::render_json(&bundle)?);
    } else {
        print!("{}", render::render_text(&bundle));
    }

    Ok(())
}
