//! Exact statistics by enumerating all 36 primary die pairs.
//!
//! Leader-death dice are not enumerated: every resolution is given
//! [PINNED_LEADER_DEATH_ROLL], so a leader counts as killed in every outcome
//! where a death roll is called for. The reported leader-death probability
//! is therefore the probability that a death roll is required. The Monte
//! Carlo engine rolls a real death die and reports a lower figure whenever
//! thresholds are nonzero.

use crate::battle::dice::DIE_FACES;
use crate::battle::{resolve_battle, BattleConfig, BattleRolls};
use crate::error::Result;
use crate::stats::aggregate::{AggregateStats, TrialColumns};

/// Leader-death roll fed to every enumerated resolution.
pub const PINNED_LEADER_DEATH_ROLL: u8 = 1;

/// Number of equally likely (attacker, defender) roll pairs.
pub const OUTCOMES: usize = (DIE_FACES as usize) * (DIE_FACES as usize);

/// Resolves every (attacker roll, defender roll) pair in order.
pub fn enumerate_outcomes(battle: &BattleConfig) -> TrialColumns {
    let mut columns = TrialColumns::with_capacity(OUTCOMES);
    for attacker in 1..=DIE_FACES {
        for defender in 1..=DIE_FACES {
            let rolls = BattleRolls::new(
                attacker,
                defender,
                PINNED_LEADER_DEATH_ROLL,
                PINNED_LEADER_DEATH_ROLL,
            );
            columns.record(battle, &resolve_battle(battle, rolls));
        }
    }
    columns
}

/// Deterministic statistics for `battle`; same input, same output.
pub fn exact_stats(battle: &BattleConfig) -> Result<AggregateStats> {
    let stats = enumerate_outcomes(battle).aggregate(battle.size_tier())?;
    tracing::debug!(
        attacker_size = battle.attacker_size,
        defender_size = battle.defender_size,
        tier = %stats.battle_size,
        attacker_win = stats.attacker_win_probability,
        "exact statistics computed"
    );
    Ok(stats)
}
