pub mod config;
pub mod crt;
pub mod dice;
pub mod outcome;
pub mod ratio;
pub mod resolution;

pub use config::{BattleConfig, BattleSizeTier, ForceRatio, Side, MAX_ELITES_COMMITTED};
pub use crt::CrtHits;
pub use dice::{DieSource, ScriptedDice, SplitMixDice};
pub use outcome::{resolve_outcome, CrtOutcome};
pub use ratio::{force_ratio, is_overrun, modifiers, Modifiers, RatioAssessment};
pub use resolution::{
    resolve_battle, resolve_battle_from_dice, BattleOutcome, BattleRolls, DICE_PER_BATTLE,
};
