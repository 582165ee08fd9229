use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use powser::config::{DEFAULT_MAX_LOG, EngineConfig};
use powser::field::Fp;
use powser::newton;
use powser::ntt::{NttEngine, naive_mul};
use powser::{FpSeries, MODULUS};

#[derive(Debug, Parser)]
#[command(name = "powser")]
#[command(about = "Power-series arithmetic modulo 998244353")]
struct Cli {
    /// Transform tables cover sizes up to 2^max_log.
    #[arg(long, default_value_t = DEFAULT_MAX_LOG, global = true)]
    max_log: usize,
    #[arg(long, default_value_t = false, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    Mul {
        #[arg(long)]
        a: String,
        #[arg(long)]
        b: String,
    },
    Square {
        #[arg(long)]
        a: String,
    },
    Inverse {
        #[arg(long)]
        a: String,
        #[arg(long)]
        precision: usize,
    },
    Sqrt {
        #[arg(long)]
        a: String,
        #[arg(long)]
        precision: usize,
    },
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let engine = NttEngine::<MODULUS>::new(EngineConfig::new(cli.max_log)?)?;
    match cli.command {
        Cmd::Mul { a, b } => {
            let product = parse_series(&a)?.multiply(&parse_series(&b)?, &engine)?;
            println!("{product}");
        }
        Cmd::Square { a } => println!("{}", parse_series(&a)?.square(&engine)?),
        Cmd::Inverse { a, precision } => {
            let b = newton::inverse(&engine, &parse_series(&a)?, precision)?;
            println!("{}", b.trimmed(precision));
        }
        Cmd::Sqrt { a, precision } => {
            let b = newton::sqrt(&engine, &parse_series(&a)?, precision)?;
            println!("{}", b.trimmed(precision));
        }
        Cmd::Demo => run_demo(&engine)?,
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_series(text: &str) -> Result<FpSeries> {
    let mut coeffs = Vec::new();
    for token in text.split(',').map(str::trim) {
        if token.is_empty() {
            continue;
        }
        let value = token
            .parse::<i64>()
            .with_context(|| format!("invalid coefficient: {}", token))?;
        coeffs.push(value);
    }
    Ok(FpSeries::from_i64s(&coeffs))
}

fn run_demo(engine: &NttEngine<MODULUS>) -> Result<()> {
    let a = FpSeries::from_u64s(&[1, 2, 3]);
    let b = FpSeries::from_u64s(&[4, 5]);
    let fast = a.multiply(&b, engine)?;
    let naive = naive_mul(a.coeffs(), b.coeffs());
    println!("MUL {a} * {b} = {fast}");
    if fast.coeffs() != naive.as_slice() {
        bail!("transform product disagrees with naive convolution");
    }

    let one_plus_x = FpSeries::from_u64s(&[1, 1]);
    let inv = newton::inverse(engine, &one_plus_x, 4)?.trimmed(4);
    println!("INVERSE 1/(1+x) mod x^4 = {inv}");

    let square = FpSeries::from_u64s(&[1, 2, 1]);
    let root = newton::sqrt(engine, &square, 3)?.trimmed(3);
    println!("SQRT sqrt(1+2x+x^2) mod x^3 = {root}");

    let half = Fp::new(2).inv()?;
    println!("FIELD p={} 1/2={}", MODULUS, half);
    Ok(())
}
