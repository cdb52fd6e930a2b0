use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::battle::{BattleConfig, SplitMixDice};
use crate::error::Error as EngineError;
use crate::settings::Settings;
use crate::stats::{exact_stats, run_monte_carlo_parallel, AggregateStats};

#[derive(Debug, Clone, Deserialize)]
pub struct ExactRequest {
    #[serde(flatten)]
    pub battle: BattleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonteCarloRequest {
    #[serde(flatten)]
    pub battle: BattleConfig,
    /// Trials = 2^trials_exponent. Falls back to the server setting.
    pub trials_exponent: Option<u32>,
    /// Seed for reproducible runs. Drawn from OS entropy when absent.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExactResponse {
    pub status: &'static str,
    pub engine: &'static str,
    pub battle: BattleConfig,
    pub stats: AggregateStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloResponse {
    pub status: &'static str,
    pub engine: &'static str,
    pub battle: BattleConfig,
    pub trials: usize,
    pub seed: u64,
    pub attacker_win_95_ci: [f64; 2],
    pub stats: AggregateStats,
}

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Invalid request body: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0}")]
    Validation(EngineError),
    #[error("{0}")]
    Engine(EngineError),
}

impl PayloadError {
    fn from_engine(err: EngineError) -> Self {
        match err {
            EngineError::TrialsExponentOutOfRange { .. } | EngineError::InvalidBattle(_) => {
                Self::Validation(err)
            }
            other => Self::Engine(other),
        }
    }
}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "antietam-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn exact_payload(body: &str) -> Result<String, PayloadError> {
    let req: ExactRequest = serde_json::from_str(body)?;
    req.battle.validate().map_err(PayloadError::from_engine)?;
    let stats = exact_stats(&req.battle).map_err(PayloadError::from_engine)?;

    let response = ExactResponse {
        status: "ok",
        engine: "exact",
        battle: req.battle,
        stats,
    };
    Ok(serde_json::to_string_pretty(&response)?)
}

pub fn monte_carlo_payload(body: &str, settings: &Settings) -> Result<String, PayloadError> {
    let req: MonteCarloRequest = serde_json::from_str(body)?;
    req.battle.validate().map_err(PayloadError::from_engine)?;

    let seed = match req.seed {
        Some(seed) => seed,
        None => SplitMixDice::from_entropy()
            .map_err(PayloadError::from_engine)?
            .next_u64(),
    };
    let exponent = req.trials_exponent.unwrap_or(settings.trials_exponent);
    let run = run_monte_carlo_parallel(&req.battle, exponent, seed, &settings.pool)
        .map_err(PayloadError::from_engine)?;

    let response = MonteCarloResponse {
        status: "ok",
        engine: "monte_carlo",
        battle: req.battle,
        trials: run.trials,
        seed,
        attacker_win_95_ci: binomial_95_ci(run.stats.attacker_win_probability, run.trials),
        stats: run.stats,
    };
    Ok(serde_json::to_string_pretty(&response)?)
}

/// Normal-approximation 95% interval for a sampled probability.
fn binomial_95_ci(p: f64, n: usize) -> [f64; 2] {
    if n == 0 {
        return [0.0, 0.0];
    }
    let z = 1.96;
    let se = (p * (1.0 - p) / n as f64).sqrt();
    [(p - z * se).max(0.0), (p + z * se).min(1.0)]
}
