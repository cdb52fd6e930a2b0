use rayon::prelude::*;
use serde::Serialize;

use crate::battle::{resolve_battle, BattleConfig, BattleRolls, DieSource, SplitMixDice, DICE_PER_BATTLE};
use crate::error::{Error, Result};
use crate::parallel::{trial_shards, WorkerPool};
use crate::stats::aggregate::{AggregateStats, TrialColumns};

/// Largest accepted trials exponent (2^24 trials, roughly 16.7 million).
pub const MAX_TRIALS_EXPONENT: u32 = 24;

/// Fixed shard count for the parallel runner. Independent of the worker
/// count so a seed gives the same answer on every machine.
pub const TRIAL_SHARDS: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonteCarloRun {
    pub trials: usize,
    pub stats: AggregateStats,
}

/// Named trial budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonteCarloPreset {
    /// 1,024 trials, for interactive previews.
    Quick,
    /// 16,384 trials.
    Standard,
    /// 131,072 trials, close enough to compare against exact statistics.
    Detailed,
}

impl MonteCarloPreset {
    pub const fn trials_exponent(self) -> u32 {
        match self {
            Self::Quick => 10,
            Self::Standard => 14,
            Self::Detailed => 17,
        }
    }
}

impl Default for MonteCarloPreset {
    fn default() -> Self {
        Self::Standard
    }
}

/// `2^exponent`, or an error when the exponent is out of range.
pub fn trials_for_exponent(exponent: u32) -> Result<usize> {
    if exponent > MAX_TRIALS_EXPONENT {
        return Err(Error::TrialsExponentOutOfRange {
            exponent,
            max: MAX_TRIALS_EXPONENT,
        });
    }
    Ok(1_usize << exponent)
}

/// Resolves `trials` battles from one pre-generated batch of dice.
pub fn simulate_trials<S>(battle: &BattleConfig, trials: usize, source: &mut S) -> Result<TrialColumns>
where
    S: DieSource + ?Sized,
{
    let dice = source.roll_many(trials * DICE_PER_BATTLE);
    let mut columns = TrialColumns::with_capacity(trials);
    for chunk in dice.chunks_exact(DICE_PER_BATTLE) {
        let rolls = BattleRolls::from_slice(chunk)?;
        columns.record(battle, &resolve_battle(battle, rolls));
    }
    Ok(columns)
}

/// Samples `2^trials_exponent` battles with dice from `source`.
pub fn run_monte_carlo<S>(battle: &BattleConfig, trials_exponent: u32, source: &mut S) -> Result<MonteCarloRun>
where
    S: DieSource + ?Sized,
{
    let trials = trials_for_exponent(trials_exponent)?;
    let columns = simulate_trials(battle, trials, source)?;
    let stats = columns.aggregate(battle.size_tier())?;
    tracing::debug!(
        trials,
        tier = %stats.battle_size,
        attacker_win = stats.attacker_win_probability,
        "monte carlo run complete"
    );
    Ok(MonteCarloRun { trials, stats })
}

/// Like [run_monte_carlo] but splits the trials into [TRIAL_SHARDS] shards
/// across the pool's workers. Shard `i` rolls from `SplitMixDice::new(seed + i)`.
pub fn run_monte_carlo_parallel(
    battle: &BattleConfig,
    trials_exponent: u32,
    seed: u64,
    pool: &WorkerPool,
) -> Result<MonteCarloRun> {
    let trials = trials_for_exponent(trials_exponent)?;
    let shards = trial_shards(trials, TRIAL_SHARDS);

    let partials: Vec<Result<TrialColumns>> = pool.install(|| {
        shards
            .par_iter()
            .enumerate()
            .map(|(index, range)| {
                let mut dice = SplitMixDice::new(seed.wrapping_add(index as u64));
                simulate_trials(battle, range.len(), &mut dice)
            })
            .collect()
    });

    let mut columns = TrialColumns::with_capacity(trials);
    for partial in partials {
        columns.append(partial?);
    }
    let stats = columns.aggregate(battle.size_tier())?;
    tracing::debug!(
        trials,
        shards = shards.len(),
        workers = pool.workers,
        "parallel monte carlo run complete"
    );
    Ok(MonteCarloRun { trials, stats })
}

/// Runs a preset budget with a seeded stream.
pub fn run_preset(battle: &BattleConfig, preset: MonteCarloPreset, seed: u64) -> Result<MonteCarloRun> {
    run_monte_carlo(battle, preset.trials_exponent(), &mut SplitMixDice::new(seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::ScriptedDice;

    #[test]
    fn exponent_bounds() {
        assert_eq!(trials_for_exponent(0).expect("2^0"), 1);
        assert_eq!(trials_for_exponent(14).expect("2^14"), 16_384);
        assert!(matches!(
            trials_for_exponent(25),
            Err(Error::TrialsExponentOutOfRange { exponent: 25, max: 24 })
        ));
    }

    #[test]
    fn scripted_dice_give_exact_frequencies() {
        // Attacker 6 vs defender 1 then attacker 1 vs defender 6, alternating.
        let mut dice = ScriptedDice::new(vec![6, 1, 1, 1, 1, 6, 1, 1]).expect("valid script");
        let run = run_monte_carlo(&BattleConfig::new(5, 5), 4, &mut dice).expect("run");
        assert_eq!(run.trials, 16);
        assert_eq!(run.stats.attacker_win_probability, 0.5);
        assert_eq!(run.stats.defender_win_probability, 0.5);
        assert_eq!(run.stats.hits.to_defender.mean, 1.0);
        assert_eq!(run.stats.hits.to_defender.std_dev, 1.0);
        assert_eq!(run.stats.hits.to_attacker.mean, 1.0);
        assert_eq!(run.stats.hits.to_attacker.std_dev, 0.0);
    }

    #[test]
    fn presets_map_to_power_of_two_budgets() {
        assert_eq!(MonteCarloPreset::Quick.trials_exponent(), 10);
        assert_eq!(MonteCarloPreset::default().trials_exponent(), 14);
        let run = run_preset(&BattleConfig::new(2, 2), MonteCarloPreset::Quick, 3).expect("run");
        assert_eq!(run.trials, 1024);
    }

    #[test]
    fn parallel_result_does_not_depend_on_worker_count() {
        let battle = BattleConfig::new(6, 4);
        let single = run_monte_carlo_parallel(&battle, 12, 99, &WorkerPool::with_workers(1)).expect("run");
        let many = run_monte_carlo_parallel(&battle, 12, 99, &WorkerPool::with_workers(4)).expect("run");
        assert_eq!(single, many);
        assert_eq!(single.trials, 4096);
    }
}
