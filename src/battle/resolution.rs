//! Full resolution of one combat: results table, hit caps, the mutual
//! wipeout tie-break, advance after combat and leader death.

use serde::Serialize;

use crate::battle::config::{BattleConfig, BattleSizeTier, Side};
use crate::battle::outcome::resolve_outcome;
use crate::battle::ratio::is_overrun;
use crate::error::{Error, Result};

/// Die values consumed by one resolution.
pub const DICE_PER_BATTLE: usize = 4;

/// The four independent dice of one combat. The leader-death dice are only
/// read when the matching threshold is nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleRolls {
    pub attacker: u8,
    pub defender: u8,
    pub attacker_leader_death: u8,
    pub defender_leader_death: u8,
}

impl BattleRolls {
    pub fn new(attacker: u8, defender: u8, attacker_leader_death: u8, defender_leader_death: u8) -> Self {
        Self {
            attacker,
            defender,
            attacker_leader_death,
            defender_leader_death,
        }
    }

    /// Takes the first four values. Fewer than four is a caller bug.
    pub fn from_slice(dice: &[u8]) -> Result<Self> {
        match dice {
            [attacker, defender, attacker_leader_death, defender_leader_death, ..] => Ok(Self::new(
                *attacker,
                *defender,
                *attacker_leader_death,
                *defender_leader_death,
            )),
            _ => Err(Error::NotEnoughDice {
                expected: DICE_PER_BATTLE,
                actual: dice.len(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BattleOutcome {
    pub winner: Side,
    pub damage_to_defender: u32,
    pub damage_to_attacker: u32,
    pub attacker_leader_death: bool,
    pub defender_leader_death: bool,
    /// The death roll, present only when one was needed.
    pub attacker_leader_death_roll: Option<u8>,
    pub defender_leader_death_roll: Option<u8>,
    pub attacker_can_hold: bool,
    pub attacker_can_continue: bool,
    pub attacker_wiped_out: bool,
    pub defender_wiped_out: bool,
    pub battle_size: BattleSizeTier,
    pub attacker_roll: u8,
    pub defender_roll: u8,
    pub star: bool,
    pub overrun: bool,
}

impl BattleOutcome {
    /// Counted as an elite loss: the attacker committed elites and took at
    /// least one hit.
    pub fn attacker_lost_elite(&self, battle: &BattleConfig) -> bool {
        battle.attacker_elites > 0 && self.damage_to_attacker > 0
    }

    /// Defender counterpart of [BattleOutcome::attacker_lost_elite].
    pub fn defender_lost_elite(&self, battle: &BattleConfig) -> bool {
        battle.defender_elites > 0 && self.damage_to_defender > 0
    }
}

pub fn resolve_battle(battle: &BattleConfig, rolls: BattleRolls) -> BattleOutcome {
    let raw = resolve_outcome(battle, rolls.attacker, rolls.defender);

    let winner = if raw.hits_to_defender > raw.hits_to_attacker
        || (raw.hits_to_defender == raw.hits_to_attacker && raw.star)
    {
        Side::Attacker
    } else {
        Side::Defender
    };
    let mut attacker_can_hold = winner == Side::Attacker;

    let mut damage_to_defender = raw
        .hits_to_defender
        .min(battle.attacker_size.saturating_mul(2));
    let mut damage_to_attacker = raw
        .hits_to_attacker
        .min(battle.defender_size.saturating_mul(2));

    let mut defender_wiped_out = damage_to_defender >= battle.defender_size;
    let mut attacker_wiped_out = damage_to_attacker >= battle.attacker_size;

    // The loser keeps exactly one step so the winner is never annihilated alongside it.
    if defender_wiped_out && attacker_wiped_out {
        match winner {
            Side::Attacker => {
                damage_to_attacker = battle.attacker_size.saturating_sub(1);
                attacker_wiped_out = false;
            }
            Side::Defender => {
                damage_to_defender = battle.defender_size.saturating_sub(1);
                defender_wiped_out = false;
            }
        }
    }

    // A side cannot lose more steps than it committed.
    damage_to_defender = damage_to_defender.min(battle.defender_size);
    damage_to_attacker = damage_to_attacker.min(battle.attacker_size);

    let outnumbers_two_to_one =
        u64::from(battle.attacker_size) >= 2 * u64::from(battle.defender_size);
    let mut attacker_can_continue = false;
    if defender_wiped_out && winner == Side::Defender && !battle.fort_present {
        attacker_can_hold = true;
        attacker_can_continue = outnumbers_two_to_one;
    }
    if winner == Side::Attacker && outnumbers_two_to_one {
        attacker_can_continue = true;
    }

    let attacker_leader_death_roll =
        (raw.attacker_leader_death_threshold > 0).then_some(rolls.attacker_leader_death);
    let defender_leader_death_roll =
        (raw.defender_leader_death_threshold > 0).then_some(rolls.defender_leader_death);

    BattleOutcome {
        winner,
        damage_to_defender,
        damage_to_attacker,
        attacker_leader_death: attacker_leader_death_roll
            .is_some_and(|roll| roll <= raw.attacker_leader_death_threshold),
        defender_leader_death: defender_leader_death_roll
            .is_some_and(|roll| roll <= raw.defender_leader_death_threshold),
        attacker_leader_death_roll,
        defender_leader_death_roll,
        attacker_can_hold,
        attacker_can_continue,
        attacker_wiped_out,
        defender_wiped_out,
        battle_size: battle.size_tier(),
        attacker_roll: rolls.attacker,
        defender_roll: rolls.defender,
        star: raw.star,
        overrun: is_overrun(battle),
    }
}

/// Slice form of [resolve_battle] for callers holding a flat die stream.
pub fn resolve_battle_from_dice(battle: &BattleConfig, dice: &[u8]) -> Result<BattleOutcome> {
    Ok(resolve_battle(battle, BattleRolls::from_slice(dice)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_requires_four_values() {
        let err = BattleRolls::from_slice(&[3, 4, 5]).expect_err("three dice must be rejected");
        assert_eq!(
            err,
            Error::NotEnoughDice {
                expected: 4,
                actual: 3
            }
        );
        assert_eq!(
            BattleRolls::from_slice(&[1, 2, 3, 4, 5]).expect("extra dice are ignored"),
            BattleRolls::new(1, 2, 3, 4)
        );
    }

    #[test]
    fn attacker_wins_ties_with_star() {
        let mut battle = BattleConfig::new(5, 5);
        battle.attacker_elites = 2;
        battle.defender_leader_drm = 1;
        // Both modified rolls are 7: two hits each way, and the attacker's 7 is a star.
        let outcome = resolve_battle(&battle, BattleRolls::new(5, 6, 6, 6));
        assert_eq!(outcome.damage_to_defender, 2);
        assert_eq!(outcome.damage_to_attacker, 2);
        assert!(outcome.star);
        assert_eq!(outcome.winner, Side::Attacker);
        assert!(outcome.attacker_can_hold);
    }

    #[test]
    fn leader_death_roll_is_only_read_when_needed() {
        let battle = BattleConfig::new(5, 5);
        let outcome = resolve_battle(&battle, BattleRolls::new(3, 3, 1, 1));
        assert_eq!(outcome.attacker_leader_death_roll, None);
        assert_eq!(outcome.defender_leader_death_roll, None);
        assert!(!outcome.attacker_leader_death);
        assert!(!outcome.defender_leader_death);
    }
}
