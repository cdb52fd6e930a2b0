//! Aggregate result records and the per-trial columns they are built from.
//!
//! Both engines record resolved battles into [TrialColumns] and reduce them
//! with the same [TrialColumns::aggregate], so exact and sampled statistics
//! always have identical shape.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::battle::{crt, BattleConfig, BattleOutcome, BattleSizeTier, Side};
use crate::error::Result;
use crate::stats::vectorized::{distribution, mean_and_std_dev, sum};

/// Hits suffered by one side across a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitSummary {
    pub mean: f64,
    pub std_dev: f64,
    /// Hit count -> probability. Counts above the table maximum are folded
    /// into the top entry.
    pub distribution: BTreeMap<u32, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitStats {
    pub to_defender: HitSummary,
    pub to_attacker: HitSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStats {
    pub battle_size: BattleSizeTier,
    pub attacker_win_probability: f64,
    pub defender_win_probability: f64,
    pub hits: HitStats,
    pub attacker_leader_death_probability: f64,
    pub defender_leader_death_probability: f64,
    pub star_probability: f64,
    pub overrun_probability: f64,
    pub attacker_elite_loss_probability: f64,
    pub defender_elite_loss_probability: f64,
    pub attacker_can_hold_probability: f64,
    pub attacker_can_continue_probability: f64,
}

/// One entry per resolved battle: 0/1 indicators and raw hit counts.
#[derive(Debug, Clone, Default)]
pub struct TrialColumns {
    pub attacker_wins: Vec<u8>,
    pub hits_to_defender: Vec<u32>,
    pub hits_to_attacker: Vec<u32>,
    pub attacker_leader_deaths: Vec<u8>,
    pub defender_leader_deaths: Vec<u8>,
    pub stars: Vec<u8>,
    pub overruns: Vec<u8>,
    pub attacker_elite_losses: Vec<u8>,
    pub defender_elite_losses: Vec<u8>,
    pub attacker_can_hold: Vec<u8>,
    pub attacker_can_continue: Vec<u8>,
}

impl TrialColumns {
    pub fn with_capacity(trials: usize) -> Self {
        Self {
            attacker_wins: Vec::with_capacity(trials),
            hits_to_defender: Vec::with_capacity(trials),
            hits_to_attacker: Vec::with_capacity(trials),
            attacker_leader_deaths: Vec::with_capacity(trials),
            defender_leader_deaths: Vec::with_capacity(trials),
            stars: Vec::with_capacity(trials),
            overruns: Vec::with_capacity(trials),
            attacker_elite_losses: Vec::with_capacity(trials),
            defender_elite_losses: Vec::with_capacity(trials),
            attacker_can_hold: Vec::with_capacity(trials),
            attacker_can_continue: Vec::with_capacity(trials),
        }
    }

    pub fn len(&self) -> usize {
        self.attacker_wins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attacker_wins.is_empty()
    }

    pub fn record(&mut self, battle: &BattleConfig, outcome: &BattleOutcome) {
        self.attacker_wins
            .push(u8::from(outcome.winner == Side::Attacker));
        self.hits_to_defender.push(outcome.damage_to_defender);
        self.hits_to_attacker.push(outcome.damage_to_attacker);
        self.attacker_leader_deaths
            .push(u8::from(outcome.attacker_leader_death));
        self.defender_leader_deaths
            .push(u8::from(outcome.defender_leader_death));
        self.stars.push(u8::from(outcome.star));
        self.overruns.push(u8::from(outcome.overrun));
        self.attacker_elite_losses
            .push(u8::from(outcome.attacker_lost_elite(battle)));
        self.defender_elite_losses
            .push(u8::from(outcome.defender_lost_elite(battle)));
        self.attacker_can_hold
            .push(u8::from(outcome.attacker_can_hold));
        self.attacker_can_continue
            .push(u8::from(outcome.attacker_can_continue));
    }

    /// Appends another shard's columns after this one's.
    pub fn append(&mut self, mut other: TrialColumns) {
        self.attacker_wins.append(&mut other.attacker_wins);
        self.hits_to_defender.append(&mut other.hits_to_defender);
        self.hits_to_attacker.append(&mut other.hits_to_attacker);
        self.attacker_leader_deaths
            .append(&mut other.attacker_leader_deaths);
        self.defender_leader_deaths
            .append(&mut other.defender_leader_deaths);
        self.stars.append(&mut other.stars);
        self.overruns.append(&mut other.overruns);
        self.attacker_elite_losses
            .append(&mut other.attacker_elite_losses);
        self.defender_elite_losses
            .append(&mut other.defender_elite_losses);
        self.attacker_can_hold.append(&mut other.attacker_can_hold);
        self.attacker_can_continue
            .append(&mut other.attacker_can_continue);
    }

    pub fn aggregate(&self, tier: BattleSizeTier) -> Result<AggregateStats> {
        let n = self.len();
        let probability = |column: &[u8]| {
            if n == 0 {
                0.0
            } else {
                sum(column) as f64 / n as f64
            }
        };

        let attacker_win_probability = probability(&self.attacker_wins);
        let defender_win_probability = if n == 0 {
            0.0
        } else {
            (n as u64 - sum(&self.attacker_wins)) as f64 / n as f64
        };

        Ok(AggregateStats {
            battle_size: tier,
            attacker_win_probability,
            defender_win_probability,
            hits: HitStats {
                to_defender: summarize(
                    &self.hits_to_defender,
                    crt::max_hits_to_defender(tier),
                )?,
                to_attacker: summarize(
                    &self.hits_to_attacker,
                    crt::max_hits_to_attacker(tier),
                )?,
            },
            attacker_leader_death_probability: probability(&self.attacker_leader_deaths),
            defender_leader_death_probability: probability(&self.defender_leader_deaths),
            star_probability: probability(&self.stars),
            overrun_probability: probability(&self.overruns),
            attacker_elite_loss_probability: probability(&self.attacker_elite_losses),
            defender_elite_loss_probability: probability(&self.defender_elite_losses),
            attacker_can_hold_probability: probability(&self.attacker_can_hold),
            attacker_can_continue_probability: probability(&self.attacker_can_continue),
        })
    }
}

fn summarize(hits: &[u32], max_hits: u32) -> Result<HitSummary> {
    let moments = mean_and_std_dev(hits);
    let bins = distribution(hits, max_hits as usize)?;
    Ok(HitSummary {
        mean: moments.mean,
        std_dev: moments.std_dev,
        distribution: (0_u32..).zip(bins).collect(),
    })
}
