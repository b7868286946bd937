//! Terminal runner for the skirmish simulation.
//!
//! Plays one seeded run, streams the transcript to stdout, then undoes every
//! recorded command and checks that both actors are back where they began.
//!
//! # Examples
//!
//! ```bash
//! # Default run, one second between steps
//! cargo run -p skirmish-cli
//!
//! # Fixed seed, no pauses
//! cargo run -p skirmish-cli -- --seed 42 --no-wait
//!
//! # Machine-readable report
//! cargo run -p skirmish-cli -- --seed 42 --no-wait --json
//! ```
//!
//! Diagnostics go to stderr and follow `RUST_LOG` (default `warn`).

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use skirmish_core::{NullSink, Simulation, SimulationConfig, WriterSink};

/// Flag spelling accepted for compatibility with older launch scripts.
const LEGACY_NO_WAIT: &str = "-nowait";

/// Two-actor skirmish on a reversible command log
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Two-actor skirmish on a reversible command log", long_about = None)]
#[command(version)]
struct Cli {
    /// Seed for the decision source (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Step budget
    #[arg(long)]
    steps: Option<u32>,

    /// Skip the pause between steps (also accepted as `-nowait`)
    #[arg(long)]
    no_wait: bool,

    /// JSON file with simulation settings; flags override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the run report as JSON instead of the transcript
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Defaults, then the config file, then flags.
    fn simulation_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                SimulationConfig::from_json_str(&text)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => SimulationConfig::default(),
        };

        if let Some(steps) = self.steps {
            config = config.with_steps(steps);
        }
        if self.no_wait {
            config = config.with_pacing(false);
        }
        config.validate().context("invalid simulation settings")?;
        Ok(config)
    }
}

/// Rewrites the legacy single-dash flag into its clap spelling.
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| {
            if arg == LEGACY_NO_WAIT {
                OsString::from("--no-wait")
            } else {
                arg
            }
        })
        .collect()
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    setup_logging();

    let config = cli.simulation_config()?;
    let seed = cli.seed.unwrap_or_else(rand::random);
    tracing::debug!(?config, seed, "starting skirmish");

    let mut sim = Simulation::seeded(config, seed).context("failed to set up simulation")?;

    if cli.json {
        let report = sim.run(&mut NullSink).context("skirmish run failed")?;
        let json = serde_json::to_string_pretty(&report).context("failed to encode report")?;
        println!("{json}");
    } else {
        let mut sink = WriterSink::new(io::stdout().lock());
        sim.run(&mut sink).context("skirmish run failed")?;
    }

    Ok(())
}
