//! restaurant: runs the restaurant simulation from the command line.
//!
//! ```console
//! $ restaurant                                  # defaults, one run, CSV in ./output
//! $ restaurant --config lunch.json --tables 6   # JSON config plus overrides
//! $ restaurant --replications 100               # seeds seed..seed+100, summary only
//! $ restaurant --no-takeout                     # dine-in only
//! $ RUST_LOG=resto_des=trace restaurant         # every fired event
//! ```

mod cli;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use resto_output::{CsvWriter, OutputWriter, PoolRow, SimOutputObserver, SqliteWriter, SummaryRow};
use resto_sim::{RestaurantConfig, SimBuilder, replicate};

use cli::{Cli, OutputFormat};

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.resolve_config()?;
    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }
    config.validate()?;

    let started = Instant::now();
    if cli.replications > 1 {
        run_replications(&config, cli.replications, &cli.out, cli.format)?;
    } else {
        run_single(&config, &cli.out, cli.format)?;
    }
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "done");
    Ok(())
}

fn run_single(config: &RestaurantConfig, out: &Path, format: OutputFormat) -> Result<()> {
    let mut sim = SimBuilder::new(config.clone()).build()?;
    let seed = config.random_seed;

    let stats = match format {
        OutputFormat::Csv => {
            let mut obs = SimOutputObserver::new(CsvWriter::new(out)?, seed);
            let stats = sim.run(&mut obs)?;
            if let Some(e) = obs.take_error() {
                return Err(e).context("writing CSV output");
            }
            stats
        }
        OutputFormat::Sqlite => {
            let mut obs = SimOutputObserver::new(SqliteWriter::new(out)?, seed);
            let stats = sim.run(&mut obs)?;
            if let Some(e) = obs.take_error() {
                return Err(e).context("writing SQLite output");
            }
            stats
        }
    };

    println!("=== restaurant: seed {seed}, horizon {} min ===", config.simulation_duration);
    println!("generated      {:>8}", stats.generated_count);
    println!("served         {:>8}", stats.served_count);
    println!("balked         {:>8}   ({:.1}%)", stats.balked_count, stats.balk_rate * 100.0);
    println!("pending        {:>8}", stats.pending_count);
    println!("average wait   {:>8.2} min", stats.average_wait);
    println!("max wait       {:>8.2} min", stats.max_wait);
    println!(
        "dine-in        {:>8} served, avg {:.2} min",
        stats.dine_in.served, stats.dine_in.average_wait
    );
    println!(
        "takeout        {:>8} served, avg {:.2} min",
        stats.takeout.served, stats.takeout.average_wait
    );
    println!();
    println!("{:<10} {:>5} {:>7} {:>7} {:>10} {:>6}", "pool", "cap", "grants", "queued", "mean delay", "util");
    for p in &stats.pools {
        println!(
            "{:<10} {:>5} {:>7} {:>7} {:>10.2} {:>5.1}%",
            p.name,
            p.capacity,
            p.grants,
            p.queued_grants,
            p.mean_queue_delay,
            p.utilisation * 100.0
        );
    }
    println!();
    println!("output written to {}", out.display());
    Ok(())
}

fn run_replications(
    config: &RestaurantConfig,
    count:  u64,
    out:    &Path,
    format: OutputFormat,
) -> Result<()> {
    let seeds: Vec<u64> = (0..count).map(|i| config.random_seed.wrapping_add(i)).collect();
    let reps = replicate(config, &seeds)?;

    let mut writer: Box<dyn OutputWriter> = match format {
        OutputFormat::Csv => Box::new(CsvWriter::new(out)?),
        OutputFormat::Sqlite => Box::new(SqliteWriter::new(out)?),
    };
    for run in &reps.runs {
        writer.write_summary(&SummaryRow::new(run.seed, &run.stats))?;
        writer.write_pools(&PoolRow::from_snapshot(run.seed, &run.stats))?;
    }
    writer.finish()?;

    let s = reps.summary;
    println!("=== restaurant: {} replications from seed {} ===", s.runs, config.random_seed);
    println!("mean average wait  {:>8.2} min", s.mean_average_wait);
    println!("mean max wait      {:>8.2} min", s.mean_max_wait);
    println!("mean served        {:>8.1}", s.mean_served);
    println!("mean balked        {:>8.1}", s.mean_balked);
    println!("mean balk rate     {:>7.1}%", s.mean_balk_rate * 100.0);
    println!();
    println!("per-run summaries written to {}", out.display());
    Ok(())
}
