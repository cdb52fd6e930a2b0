//! Run the Monte Carlo engine for a fixed battle and optionally append one line to a log file for trend tracking.
//!
//! Usage:
//!   cargo run --release --bin benchmark_monte_carlo
//!   cargo run --release --bin benchmark_monte_carlo -- --log
//!
//! --log  Append one row to benchmark_log.csv (date, battles_per_sec, runs, trials_per_run, workers).

use std::fs::OpenOptions;
use std::io::Write;
use std::time::Instant;

use antietam::battle::BattleConfig;
use antietam::parallel::WorkerPool;
use antietam::stats::{run_monte_carlo_parallel, MonteCarloPreset};

const LOG_PATH: &str = "benchmark_log.csv";

fn main() {
    let log = std::env::args().any(|a| a == "--log");

    let battle = BattleConfig {
        fort_present: true,
        attacker_leader_drm: 2,
        defender_leader_drm: 1,
        attacker_elites: 1,
        ..BattleConfig::new(8, 6)
    };
    let exponent = MonteCarloPreset::Detailed.trials_exponent();
    let pool = WorkerPool::default();

    const MIN_DURATION_MS: u128 = 2000;
    const MIN_RUNS: u32 = 5;

    let start = Instant::now();
    let mut runs: u32 = 0;
    let mut trials_per_run = 0;
    while start.elapsed().as_millis() < MIN_DURATION_MS || runs < MIN_RUNS {
        match run_monte_carlo_parallel(&battle, exponent, u64::from(runs), &pool) {
            Ok(run) => trials_per_run = run.trials,
            Err(err) => {
                eprintln!("monte carlo run failed: {err}");
                std::process::exit(1);
            }
        }
        runs += 1;
    }
    let elapsed_secs = start.elapsed().as_secs_f64();
    let battles_per_sec = (runs as f64 * trials_per_run as f64) / elapsed_secs;

    println!("Monte Carlo benchmark (2^{exponent} trials/run):");
    println!("  Runs:        {runs}");
    println!("  Duration:    {elapsed_secs:.2} s");
    println!("  Battles/s:   {battles_per_sec:.2}");
    println!("  Workers:     {}", rayon::current_num_threads());

    if log {
        if let Err(err) = append_log_row(battles_per_sec, runs, trials_per_run) {
            eprintln!("failed to write {LOG_PATH}: {err}");
            std::process::exit(1);
        }
        println!("Appended to {LOG_PATH}");
    }
}

fn append_log_row(battles_per_sec: f64, runs: u32, trials_per_run: usize) -> std::io::Result<()> {
    let date = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    let mut file = OpenOptions::new().create(true).append(true).open(LOG_PATH)?;
    if file.metadata().map(|m| m.len() == 0).unwrap_or(true) {
        file.write_all(b"date,battles_per_sec,runs,trials_per_run,workers\n")?;
    }
    let line = format!(
        "{},{:.4},{},{},{}\n",
        date,
        battles_per_sec,
        runs,
        trials_per_run,
        rayon::current_num_threads()
    );
    file.write_all(line.as_bytes())?;
    file.flush()
}
