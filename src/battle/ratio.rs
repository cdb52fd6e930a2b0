//! Force ratio and die roll modifiers.
//!
//! Both statistics engines go through [modifiers], so the exact and sampled
//! numbers are computed from the same inputs.

use crate::battle::config::{BattleConfig, BattleSizeTier, ForceRatio};

/// DRM granted to a side when its opponent is out of supply.
pub const OUT_OF_SUPPLY_DRM: i32 = 2;
pub const INTERCEPTION_DRM: i32 = 2;
pub const FORT_DRM: i32 = 2;

/// Force ratio and the side it favours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatioAssessment {
    pub ratio: ForceRatio,
    pub favours_attacker: bool,
}

impl RatioAssessment {
    /// True when `ratio` gives the attacker more than a Low advantage.
    pub fn attacker_has_edge(&self) -> bool {
        self.favours_attacker && self.ratio > ForceRatio::Low
    }

    /// True when `ratio` gives the defender more than a Low advantage.
    pub fn defender_has_edge(&self) -> bool {
        !self.favours_attacker && self.ratio > ForceRatio::Low
    }
}

/// Everything the results table needs besides the raw dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modifiers {
    pub ratio: ForceRatio,
    pub favours_attacker: bool,
    pub attacker_drm: i32,
    pub defender_drm: i32,
    pub tier: BattleSizeTier,
}

pub fn force_ratio(battle: &BattleConfig) -> RatioAssessment {
    let favours_attacker = battle.attacker_size >= battle.defender_size;
    let (larger, smaller) = if favours_attacker {
        (battle.attacker_size, battle.defender_size)
    } else {
        (battle.defender_size, battle.attacker_size)
    };

    let ratio = if smaller == 0 {
        ForceRatio::TenToOnePlus
    } else {
        match larger / smaller {
            n if n >= 10 && favours_attacker => ForceRatio::TenToOnePlus,
            n if n >= 5 => ForceRatio::FiveToOnePlus,
            4 => ForceRatio::FourToOne,
            3 => ForceRatio::ThreeToOne,
            _ => ForceRatio::Low,
        }
    };

    RatioAssessment {
        ratio,
        favours_attacker,
    }
}

/// Overrun: at least 10:1 for the attacker with no fort in the way.
pub fn is_overrun(battle: &BattleConfig) -> bool {
    let assessment = force_ratio(battle);
    assessment.ratio == ForceRatio::TenToOnePlus
        && assessment.favours_attacker
        && !battle.fort_present
}

pub fn modifiers(battle: &BattleConfig) -> Modifiers {
    let RatioAssessment {
        ratio,
        favours_attacker,
    } = force_ratio(battle);
    let ratio_drm = ratio.drm();
    let bonus = |flag: bool, drm: i32| if flag { drm } else { 0 };

    let attacker_drm = bonus(favours_attacker, ratio_drm)
        + battle.attacker_leader_drm
        + i32::from(battle.attacker_elites)
        + bonus(battle.defender_out_of_supply, OUT_OF_SUPPLY_DRM);

    let defender_drm = bonus(!favours_attacker, ratio_drm)
        + battle.defender_leader_drm
        + i32::from(battle.defender_elites)
        + bonus(battle.interception, INTERCEPTION_DRM)
        + bonus(battle.fort_present, FORT_DRM)
        + bonus(battle.attacker_out_of_supply, OUT_OF_SUPPLY_DRM);

    Modifiers {
        ratio,
        favours_attacker,
        attacker_drm,
        defender_drm,
        tier: battle.size_tier(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio_of(attacker: u32, defender: u32) -> RatioAssessment {
        force_ratio(&BattleConfig::new(attacker, defender))
    }

    #[test]
    fn ratio_buckets_use_floor_division() {
        assert_eq!(ratio_of(5, 3).ratio, ForceRatio::Low);
        assert_eq!(ratio_of(6, 2).ratio, ForceRatio::ThreeToOne);
        assert_eq!(ratio_of(7, 2).ratio, ForceRatio::ThreeToOne);
        assert_eq!(ratio_of(8, 2).ratio, ForceRatio::FourToOne);
        assert_eq!(ratio_of(10, 2).ratio, ForceRatio::FiveToOnePlus);
        assert_eq!(ratio_of(19, 2).ratio, ForceRatio::FiveToOnePlus);
        assert_eq!(ratio_of(10, 1).ratio, ForceRatio::TenToOnePlus);
    }

    #[test]
    fn ten_to_one_is_reserved_for_the_attacker() {
        let assessment = ratio_of(1, 10);
        assert!(!assessment.favours_attacker);
        assert_eq!(assessment.ratio, ForceRatio::FiveToOnePlus);
        assert!(assessment.defender_has_edge());
    }

    #[test]
    fn equal_sizes_favour_the_attacker_at_low_ratio() {
        let assessment = ratio_of(4, 4);
        assert!(assessment.favours_attacker);
        assert_eq!(assessment.ratio, ForceRatio::Low);
        assert!(!assessment.attacker_has_edge());
        assert!(!assessment.defender_has_edge());
    }

    #[test]
    fn zero_sized_smaller_side_forces_maximal_ratio() {
        assert_eq!(ratio_of(3, 0).ratio, ForceRatio::TenToOnePlus);
        assert_eq!(ratio_of(0, 0).ratio, ForceRatio::TenToOnePlus);

        let defender_only = ratio_of(0, 3);
        assert!(!defender_only.favours_attacker);
        assert_eq!(defender_only.ratio, ForceRatio::TenToOnePlus);
        assert!(!is_overrun(&BattleConfig::new(0, 3)));
    }

    #[test]
    fn fort_prevents_overrun() {
        let mut battle = BattleConfig::new(10, 1);
        assert!(is_overrun(&battle));
        battle.fort_present = true;
        assert!(!is_overrun(&battle));
    }

    #[test]
    fn ratio_bonus_goes_to_favoured_side_only() {
        let attacker_heavy = modifiers(&BattleConfig::new(8, 2));
        assert_eq!(attacker_heavy.attacker_drm, 3);
        assert_eq!(attacker_heavy.defender_drm, 0);

        let defender_heavy = modifiers(&BattleConfig::new(2, 6));
        assert_eq!(defender_heavy.attacker_drm, 0);
        assert_eq!(defender_heavy.defender_drm, 2);
    }

    #[test]
    fn situational_modifiers_stack() {
        let battle = BattleConfig {
            attacker_leader_drm: 1,
            defender_leader_drm: 2,
            attacker_elites: 2,
            defender_elites: 1,
            interception: true,
            fort_present: true,
            attacker_out_of_supply: true,
            defender_out_of_supply: true,
            ..BattleConfig::new(5, 5)
        };
        let mods = modifiers(&battle);
        assert_eq!(mods.attacker_drm, 1 + 2 + 2);
        assert_eq!(mods.defender_drm, 2 + 1 + 2 + 2 + 2);
        assert_eq!(mods.tier, BattleSizeTier::Medium);
    }
}
