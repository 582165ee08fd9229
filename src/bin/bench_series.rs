use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use powser::bench::{BenchConfig, run_to_csv};
use powser::config::EngineConfig;
use powser::{MODULUS, NttEngine};

#[derive(Debug, Parser)]
#[command(name = "bench_series")]
struct Cli {
    #[arg(long, default_value_t = 4)]
    min_log: usize,
    #[arg(long, default_value_t = 14)]
    max_log: usize,
    #[arg(long, default_value_t = 11)]
    naive_max_log: usize,
    #[arg(long, default_value_t = 3)]
    reps: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long)]
    csv: String,
    #[arg(long, default_value_t = false)]
    progress: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    run_from_args(&cli)
}

fn run_from_args(cli: &Cli) -> Result<()> {
    if cli.min_log > cli.max_log {
        bail!("min_log {} exceeds max_log {}", cli.min_log, cli.max_log);
    }
    // Products of two length-2^max_log series need a transform twice as long.
    let engine = NttEngine::<MODULUS>::new(EngineConfig::new(cli.max_log + 1)?)?;
    let cfg = BenchConfig {
        min_log: cli.min_log,
        max_log: cli.max_log,
        naive_max_log: cli.naive_max_log,
        reps: cli.reps,
        seed: cli.seed,
    };
    let path = PathBuf::from(&cli.csv);
    let rows = run_to_csv(&engine, cfg, &path, cli.progress)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("rows={}", rows.len());
    Ok(())
}
