use crate::battle::config::BattleConfig;
use crate::battle::crt;
use crate::battle::ratio::{force_ratio, is_overrun, modifiers};

/// Modified roll that puts the roller's own leader at greater risk.
const HIGH_ROLL: i32 = 10;
/// Leader dies on 1-3 when its own side rolled 10+.
const OWN_HIGH_ROLL_DEATH_THRESHOLD: u8 = 3;
/// Leader dies on a 1 when only the opponent rolled 10+.
const OPPONENT_HIGH_ROLL_DEATH_THRESHOLD: u8 = 1;

/// Raw result of one pair of die rolls, before caps and tie-breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrtOutcome {
    pub hits_to_defender: u32,
    pub hits_to_attacker: u32,
    /// Critical result; never set when attacking a resource or capital.
    pub star: bool,
    /// Defender leader dies on a death roll at or below this. 0 means no roll.
    pub defender_leader_death_threshold: u8,
    /// Attacker leader dies on a death roll at or below this. 0 means no roll.
    pub attacker_leader_death_threshold: u8,
}

/// Resolves two raw die rolls against the results table.
pub fn resolve_outcome(battle: &BattleConfig, attacker_roll: u8, defender_roll: u8) -> CrtOutcome {
    if is_overrun(battle) {
        return CrtOutcome {
            hits_to_defender: battle.defender_size,
            hits_to_attacker: 0,
            star: false,
            defender_leader_death_threshold: 0,
            attacker_leader_death_threshold: 0,
        };
    }

    let mods = modifiers(battle);
    let modified_attacker = i32::from(attacker_roll) + mods.attacker_drm;
    let modified_defender = i32::from(defender_roll) + mods.defender_drm;
    let hits = crt::lookup(mods.tier, modified_attacker, modified_defender);

    let star = !battle.resource_or_capital && crt::clamp_roll(modified_attacker) > 6;

    let assessment = force_ratio(battle);
    let defender_leader_death_threshold = if assessment.defender_has_edge() {
        0
    } else {
        leader_death_threshold(modified_defender, modified_attacker)
    };
    let attacker_leader_death_threshold = if assessment.attacker_has_edge() {
        0
    } else {
        leader_death_threshold(modified_attacker, modified_defender)
    };

    CrtOutcome {
        hits_to_defender: u32::from(hits.to_defender),
        hits_to_attacker: u32::from(hits.to_attacker),
        star,
        defender_leader_death_threshold,
        attacker_leader_death_threshold,
    }
}

fn leader_death_threshold(own_modified_roll: i32, opponent_modified_roll: i32) -> u8 {
    if own_modified_roll >= HIGH_ROLL {
        OWN_HIGH_ROLL_DEATH_THRESHOLD
    } else if opponent_modified_roll >= HIGH_ROLL {
        OPPONENT_HIGH_ROLL_DEATH_THRESHOLD
    } else {
        0
    }
}
