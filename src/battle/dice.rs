//! Die-roll streams. The engines never roll dice themselves; they ask a
//! [DieSource] for a batch of values in 1..=6.
//!
//! [SplitMixDice] uses SplitMix64 for throughput and good statistical
//! quality. Deterministic: same seed produces the same rolls. Not
//! cryptographically secure.

use crate::error::{Error, Result};

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

pub const DIE_FACES: u8 = 6;

/// Batch source of independent uniform die values in 1..=6.
pub trait DieSource {
    /// Overwrites every element of `out` with a fresh roll.
    fn fill_rolls(&mut self, out: &mut [u8]);

    fn roll_many(&mut self, count: usize) -> Vec<u8> {
        let mut rolls = vec![0; count];
        self.fill_rolls(&mut rolls);
        rolls
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SplitMixDice {
    state: u64,
}

impl SplitMixDice {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seeds from the operating system's entropy source.
    pub fn from_entropy() -> Result<Self> {
        let mut seed = [0_u8; 8];
        getrandom::getrandom(&mut seed).map_err(|err| Error::Entropy(err.to_string()))?;
        Ok(Self::new(u64::from_le_bytes(seed)))
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
        z ^ (z >> 31)
    }

    /// One roll in 1..=6 from the high 32 bits (multiply-shift, no modulo).
    #[inline]
    pub fn roll(&mut self) -> u8 {
        let high = self.next_u64() >> 32;
        ((high * u64::from(DIE_FACES)) >> 32) as u8 + 1
    }
}

impl DieSource for SplitMixDice {
    fn fill_rolls(&mut self, out: &mut [u8]) {
        for slot in out {
            *slot = self.roll();
        }
    }
}

/// Replays a fixed sequence, wrapping around at the end. For tests and for
/// reproducing a reported battle.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    rolls: Vec<u8>,
    position: usize,
}

impl ScriptedDice {
    /// Every value must be a die face; an empty script is rejected.
    pub fn new(rolls: Vec<u8>) -> Result<Self> {
        if rolls.is_empty() {
            return Err(Error::InvalidDieScript("script is empty".to_string()));
        }
        if let Some(bad) = rolls.iter().find(|r| !(1..=DIE_FACES).contains(*r)) {
            return Err(Error::InvalidDieScript(format!("die value {bad} is not in 1..=6")));
        }
        Ok(Self { rolls, position: 0 })
    }
}

impl DieSource for ScriptedDice {
    fn fill_rolls(&mut self, out: &mut [u8]) {
        for slot in out {
            *slot = self.rolls[self.position];
            self.position = (self.position + 1) % self.rolls.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitmix64_deterministic() {
        let mut a = SplitMixDice::new(7);
        let mut b = SplitMixDice::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn splitmix64_different_seeds_differ() {
        let mut a = SplitMixDice::new(1);
        let mut b = SplitMixDice::new(2);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn rolls_cover_all_faces_roughly_evenly() {
        let rolls = SplitMixDice::new(42).roll_many(60_000);
        let mut counts = [0usize; 6];
        for roll in rolls {
            assert!((1..=6).contains(&roll), "roll out of range: {roll}");
            counts[usize::from(roll - 1)] += 1;
        }
        for count in counts {
            assert!((9_500..=10_500).contains(&count), "face count {count}");
        }
    }

    #[test]
    fn scripted_dice_wrap_around() {
        let mut dice = ScriptedDice::new(vec![1, 2, 3]).expect("valid script");
        assert_eq!(dice.roll_many(7), vec![1, 2, 3, 1, 2, 3, 1]);
    }

    #[test]
    fn scripted_dice_reject_non_faces() {
        assert!(matches!(ScriptedDice::new(vec![]), Err(Error::InvalidDieScript(_))));
        assert!(matches!(ScriptedDice::new(vec![0, 3]), Err(Error::InvalidDieScript(_))));
        assert!(matches!(ScriptedDice::new(vec![4, 7]), Err(Error::InvalidDieScript(_))));
    }
}
