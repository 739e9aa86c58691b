//! Command-line arguments and config resolution.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use resto_sim::RestaurantConfig;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Sqlite,
}

/// Discrete-event simulation of a restaurant with dine-in and takeout
/// customers sharing kitchen stations, servers, and tables.
///
/// Settings are applied in order: defaults, then `--config`, then flags.
#[derive(Debug, Parser)]
#[command(name = "restaurant", version)]
pub struct Cli {
    /// JSON file with any subset of the configuration fields.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Horizon in minutes.
    #[arg(long)]
    pub duration: Option<f64>,

    #[arg(long)]
    pub tables: Option<u32>,

    #[arg(long)]
    pub cooks: Option<u32>,

    #[arg(long)]
    pub servers: Option<u32>,

    /// Disable dine-in arrivals.
    #[arg(long)]
    pub no_dinein: bool,

    /// Disable takeout arrivals.
    #[arg(long)]
    pub no_takeout: bool,

    /// Stop at the horizon instead of finishing in-flight customers.
    #[arg(long)]
    pub no_drain: bool,

    /// Run this many seeds (seed, seed+1, …) and write only summaries.
    #[arg(long, default_value_t = 1)]
    pub replications: u64,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Output directory.
    #[arg(long, default_value = "output")]
    pub out: PathBuf,

    /// Print the resolved configuration as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    pub fn resolve_config(&self) -> Result<RestaurantConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => RestaurantConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.random_seed = seed;
        }
        if let Some(duration) = self.duration {
            config.simulation_duration = duration;
        }
        if let Some(tables) = self.tables {
            config.num_tables = tables;
        }
        if let Some(cooks) = self.cooks {
            config.num_cooks = cooks;
        }
        if let Some(servers) = self.servers {
            config.num_servers = servers;
        }
        if self.no_dinein {
            config.dinein_arrival_rate = f64::INFINITY;
        }
        if self.no_takeout {
            config.takeout_arrival_rate = f64::INFINITY;
        }
        if self.no_drain {
            config.drain_after_horizon = false;
        }
        Ok(config)
    }
}
