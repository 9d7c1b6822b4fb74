use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use neuron_swarm::{viewer, ConfigError, Swarm, SwarmConfig, ViewerError};

/// Neuron swarm viewer.
#[derive(Parser, Debug)]
#[command(name = "neuron-swarm")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Load settings from a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of bodies
    #[arg(short, long)]
    bodies: Option<usize>,

    /// Seed the spawn RNG for a reproducible layout
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<(), ViewerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            SwarmConfig::load(path)?
        }
        None => SwarmConfig::default(),
    };
    if let Some(count) = cli.bodies {
        config.bodies.count = count;
    }
    if let Some(seed) = cli.seed {
        config.bodies.seed = Some(seed);
    }

    if cli.dump_config {
        config.validate()?;
        let json = serde_json::to_string_pretty(&config).map_err(ConfigError::from)?;
        println!("{json}");
        return Ok(());
    }

    let swarm = Swarm::new(config)?;
    viewer::run(swarm)
}
