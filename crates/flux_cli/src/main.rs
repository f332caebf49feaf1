//! Flux CLI
//!
//! Replay pointer scenarios against the motion engine and inspect engine
//! configuration files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flux_cli::{Scenario, ScenarioRunner};
use flux_runtime::EngineConfig;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flux")]
#[command(author, version, about = "Pointer-reactive motion engine toolkit", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON scenario and print its snapshots
    Simulate {
        /// Scenario file
        scenario: PathBuf,

        /// Engine config (flux.toml); built-in presets when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Sleep through each frame and tick on the wall clock
        #[arg(long)]
        realtime: bool,
    },

    /// Validate an engine config file
    Check {
        /// Config file
        config: PathBuf,
    },

    /// Print the built-in presets as TOML
    Defaults,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Simulate {
            scenario,
            config,
            pretty,
            realtime,
        } => cmd_simulate(&scenario, config.as_deref(), pretty, realtime),
        Commands::Check { config } => cmd_check(&config),
        Commands::Defaults => cmd_defaults(),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn cmd_simulate(
    scenario_path: &Path,
    config: Option<&Path>,
    pretty: bool,
    realtime: bool,
) -> Result<()> {
    let config = load_config(config)?;
    let scenario = Scenario::from_path(scenario_path)?;

    info!(
        "Simulating {} ({} steps)",
        scenario_path.display(),
        scenario.steps.len()
    );

    let mut runner = ScenarioRunner::new(config).realtime(realtime);
    let snapshots = runner.run(&scenario)?;

    let output = if pretty {
        serde_json::to_string_pretty(&snapshots)?
    } else {
        serde_json::to_string(&snapshots)?
    };
    println!("{output}");

    info!(
        "Done: {} frames, {} snapshots, {} live values",
        runner.engine().scheduler().frame_count(),
        snapshots.len(),
        runner.engine().scheduler().live_count()
    );
    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let config = load_config(Some(path))?;
    info!(
        "{} is valid ({} particles, repulsion radius {}px)",
        path.display(),
        config.particles.count,
        config.particles.repulsion.radius
    );
    Ok(())
}

fn cmd_defaults() -> Result<()> {
    let text = EngineConfig::default()
        .to_toml()
        .context("failed to render default config")?;
    print!("{text}");
    Ok(())
}
