use std::fs::File;
use std::hint::black_box;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use crate::field::PrimeField;
use crate::newton;
use crate::ntt::{NttEngine, naive_mul};
use crate::series::PowerSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchOp {
    NaiveMul,
    NttMul,
    Inverse,
    Sqrt,
}

impl BenchOp {
    pub fn name(self) -> &'static str {
        match self {
            BenchOp::NaiveMul => "naive_mul",
            BenchOp::NttMul => "ntt_mul",
            BenchOp::Inverse => "inverse",
            BenchOp::Sqrt => "sqrt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchConfig {
    pub min_log: usize,
    pub max_log: usize,
    /// Quadratic multiplication is skipped above this size.
    pub naive_max_log: usize,
    pub reps: usize,
    pub seed: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            min_log: 4,
            max_log: 14,
            naive_max_log: 11,
            reps: 3,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchRow {
    pub op: &'static str,
    pub status: String,
    pub log_size: usize,
    pub len: usize,
    pub reps: usize,
    pub seed: u64,
    pub wall_us: Option<u128>,
}

impl BenchRow {
    pub fn csv_header() -> &'static str {
        "op,status,log_size,len,reps,seed,wall_us"
    }

    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{},{}",
            self.op,
            self.status,
            self.log_size,
            self.len,
            self.reps,
            self.seed,
            opt_u128(self.wall_us),
        )
    }
}

/// Uniform coefficients with a nonzero constant term.
pub fn random_series<const P: u64>(len: usize, rng: &mut ChaCha8Rng) -> PowerSeries<P> {
    let mut coeffs: Vec<PrimeField<P>> = (0..len)
        .map(|_| PrimeField::new(rng.random_range(0..P)))
        .collect();
    if let Some(c0) = coeffs.first_mut() {
        *c0 = PrimeField::new(rng.random_range(1..P));
    }
    PowerSeries::new(coeffs)
}

/// Times every op on series of length `2^k` for `k` in `min_log..=max_log`,
/// handing each row to `on_row` as soon as it is measured.
pub fn run_suite<const P: u64>(
    engine: &NttEngine<P>,
    cfg: BenchConfig,
    mut on_row: impl FnMut(&BenchRow) -> std::io::Result<()>,
) -> std::io::Result<Vec<BenchRow>> {
    let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed);
    let mut rows = Vec::new();
    for log_size in cfg.min_log..=cfg.max_log {
        let len = 1usize << log_size;
        let a = random_series::<P>(len, &mut rng);
        let b = random_series::<P>(len, &mut rng);
        let mut unit = random_series::<P>(len, &mut rng);
        unit -= &PowerSeries::constant(unit.coefficient(0) - PrimeField::one());

        for op in [BenchOp::NaiveMul, BenchOp::NttMul, BenchOp::Inverse, BenchOp::Sqrt] {
            if op == BenchOp::NaiveMul && log_size > cfg.naive_max_log {
                continue;
            }
            let row = run_op(engine, op, cfg, log_size, [&a, &b, &unit]);
            on_row(&row)?;
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Runs the suite, writing the CSV header before any measurement and each
/// row right after it.
pub fn run_to_csv<const P: u64>(
    engine: &NttEngine<P>,
    cfg: BenchConfig,
    csv_path: &Path,
    progress: bool,
) -> std::io::Result<Vec<BenchRow>> {
    let mut csv = File::create(csv_path)?;
    writeln!(csv, "{}", BenchRow::csv_header())?;
    csv.flush()?;

    run_suite(engine, cfg, |row| {
        if progress {
            println!(
                "op={} log_size={} status={} wall_us={}",
                row.op,
                row.log_size,
                row.status,
                row.wall_us.unwrap_or_default()
            );
        }
        writeln!(csv, "{}", row.to_csv_line())?;
        csv.flush()
    })
}

fn run_op<const P: u64>(
    engine: &NttEngine<P>,
    op: BenchOp,
    cfg: BenchConfig,
    log_size: usize,
    [a, b, unit]: [&PowerSeries<P>; 3],
) -> BenchRow {
    let len = 1usize << log_size;
    let mut row = BenchRow {
        op: op.name(),
        status: "ok".to_string(),
        log_size,
        len,
        reps: cfg.reps,
        seed: cfg.seed,
        wall_us: None,
    };
    let start = Instant::now();
    let mut outcome = Ok(());
    for _ in 0..cfg.reps.max(1) {
        outcome = match op {
            BenchOp::NaiveMul => {
                black_box(naive_mul(a.coeffs(), b.coeffs()));
                Ok(())
            }
            BenchOp::NttMul => a.multiply(b, engine).map(|c| drop(black_box(c))),
            BenchOp::Inverse => newton::inverse(engine, a, len).map(drop),
            BenchOp::Sqrt => newton::sqrt(engine, unit, len).map(drop),
        };
        if outcome.is_err() {
            break;
        }
    }
    match outcome {
        Ok(()) => row.wall_us = Some(start.elapsed().as_micros()),
        Err(e) => {
            warn!(op = op.name(), log_size, error = %e, "bench op failed");
            row.status = "error".to_string();
        }
    }
    row
}

fn opt_u128(v: Option<u128>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}
