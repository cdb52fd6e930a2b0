use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Most elite units a side may commit to one battle.
pub const MAX_ELITES_COMMITTED: u8 = 2;

/// Parameters of a single land battle. Built by the caller and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Attacking a resource or capital space; suppresses star results.
    pub resource_or_capital: bool,
    pub fort_present: bool,
    pub interception: bool,
    pub defender_leader_present: bool,
    /// Strength points committed by the attacker.
    pub attacker_size: u32,
    /// Strength points committed by the defender.
    pub defender_size: u32,
    /// Leader DRM including any cavalry intelligence bonus.
    pub attacker_leader_drm: i32,
    /// Leader DRM including any cavalry intelligence bonus.
    pub defender_leader_drm: i32,
    pub attacker_elites: u8,
    pub defender_elites: u8,
    pub attacker_out_of_supply: bool,
    pub defender_out_of_supply: bool,
    pub amphibious: bool,
}

impl BattleConfig {
    /// A battle between two forces with every modifier switched off.
    pub fn new(attacker_size: u32, defender_size: u32) -> Self {
        Self {
            attacker_size,
            defender_size,
            ..Self::default()
        }
    }

    /// Battle size tier from the total strength committed.
    pub fn size_tier(&self) -> BattleSizeTier {
        BattleSizeTier::from_sizes(self.attacker_size, self.defender_size)
    }

    /// Checks tabletop limits. The engines themselves accept any value.
    pub fn validate(&self) -> Result<()> {
        for (side, elites) in [
            (Side::Attacker, self.attacker_elites),
            (Side::Defender, self.defender_elites),
        ] {
            if elites > MAX_ELITES_COMMITTED {
                return Err(Error::InvalidBattle(format!(
                    "{side} committed {elites} elites, at most {MAX_ELITES_COMMITTED} allowed"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attacker => "Attacker",
            Self::Defender => "Defender",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which row set of the combat results table applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BattleSizeTier {
    /// Total strength of 5 or less.
    Small,
    /// Total strength of 6 to 19.
    Medium,
    /// Total strength of 20 or more.
    Large,
}

impl BattleSizeTier {
    pub const ALL: [BattleSizeTier; 3] = [Self::Small, Self::Medium, Self::Large];

    pub fn from_sizes(attacker_size: u32, defender_size: u32) -> Self {
        match u64::from(attacker_size) + u64::from(defender_size) {
            0..=5 => Self::Small,
            6..=19 => Self::Medium,
            _ => Self::Large,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Small => 0,
            Self::Medium => 1,
            Self::Large => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }
}

impl fmt::Display for BattleSizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Force ratio bucket, ordered from weakest to strongest advantage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ForceRatio {
    Low,
    ThreeToOne,
    FourToOne,
    FiveToOnePlus,
    TenToOnePlus,
}

impl ForceRatio {
    /// DRM granted to the side the ratio favours.
    pub const fn drm(self) -> i32 {
        match self {
            Self::Low => 0,
            Self::ThreeToOne => 2,
            Self::FourToOne => 3,
            Self::FiveToOnePlus | Self::TenToOnePlus => 4,
        }
    }
}
