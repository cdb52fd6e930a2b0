//! Crate-wide error type.
//!
//! Every variant except `Entropy` is a caller contract violation: the call
//! that hit it is rejected outright and nothing is clamped or padded.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Battle resolution needs two primary rolls plus two leader-death rolls.
    #[error("battle resolution needs {expected} die values, got {actual}")]
    NotEnoughDice { expected: usize, actual: usize },

    #[error("distribution maximum {max} exceeds the limit of {limit}")]
    DistributionTooWide { max: usize, limit: usize },

    #[error("trials exponent {exponent} is out of range (0..={max})")]
    TrialsExponentOutOfRange { exponent: u32, max: u32 },

    #[error("invalid battle: {0}")]
    InvalidBattle(String),

    /// A scripted die stream must be non-empty and hold only faces 1..=6.
    #[error("invalid die script: {0}")]
    InvalidDieScript(String),

    #[error("could not seed die stream: {0}")]
    Entropy(String),
}
