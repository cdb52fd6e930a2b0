//! Odds engine for single land battles: exact enumeration of the 36
//! primary die pairs, and Monte Carlo sampling over the same resolution
//! rules.

pub mod battle;
pub mod cli;
pub mod error;
pub mod parallel;
pub mod server;
pub mod settings;
pub mod stats;

pub use battle::{BattleConfig, BattleOutcome, BattleRolls, BattleSizeTier, DieSource, Side};
pub use error::{Error, Result};
pub use stats::{exact_stats, run_monte_carlo, AggregateStats, MonteCarloRun};
