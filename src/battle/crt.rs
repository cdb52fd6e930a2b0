//! Land combat results table.
//!
//! The columns are authoritative game data. Lookups go through a dense
//! `[tier][attacker roll][defender roll]` table that is built once per
//! process on first use.

use std::sync::OnceLock;

use crate::battle::config::BattleSizeTier;

/// Highest modified roll with its own row ("10 or more").
pub const MAX_MODIFIED_ROLL: i32 = 10;
const ROWS: usize = MAX_MODIFIED_ROLL as usize;

// Hits to defender, indexed by the attacker's modified roll 1..=10+.
const HITS_TO_DEFENDER: [[u8; ROWS]; 3] = [
    [0, 0, 0, 1, 1, 1, 1, 1, 1, 1],
    [0, 1, 1, 1, 1, 2, 2, 2, 2, 3],
    [1, 2, 2, 3, 3, 3, 4, 4, 5, 5],
];

// Hits to attacker, indexed by the defender's modified roll 1..=10+.
const HITS_TO_ATTACKER: [[u8; ROWS]; 3] = [
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 2],
    [1, 1, 1, 1, 1, 1, 2, 3, 3, 3],
    [1, 2, 3, 3, 3, 4, 4, 4, 5, 6],
];

/// Hits read off the table for one pair of modified rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CrtHits {
    pub to_defender: u8,
    pub to_attacker: u8,
}

type TierTable = [[CrtHits; ROWS]; ROWS];

struct DenseCrt {
    tiers: [TierTable; 3],
}

impl DenseCrt {
    fn build() -> Self {
        let mut tiers = [[[CrtHits::default(); ROWS]; ROWS]; 3];
        for tier in BattleSizeTier::ALL {
            let t = tier.index();
            for (a, row) in tiers[t].iter_mut().enumerate() {
                for (d, cell) in row.iter_mut().enumerate() {
                    *cell = CrtHits {
                        to_defender: HITS_TO_DEFENDER[t][a],
                        to_attacker: HITS_TO_ATTACKER[t][d],
                    };
                }
            }
        }
        tracing::debug!("combat results table materialised");
        Self { tiers }
    }
}

static DENSE_CRT: OnceLock<DenseCrt> = OnceLock::new();

fn dense() -> &'static DenseCrt {
    DENSE_CRT.get_or_init(DenseCrt::build)
}

/// Forces the dense table to be built now instead of on first lookup.
pub fn warm_up() {
    dense();
}

/// Clamps a modified roll into the table's 1..=10 range.
pub fn clamp_roll(modified_roll: i32) -> i32 {
    modified_roll.clamp(1, MAX_MODIFIED_ROLL)
}

/// Looks up both hit columns. Rolls outside 1..=10 are clamped first.
pub fn lookup(
    tier: BattleSizeTier,
    modified_attacker_roll: i32,
    modified_defender_roll: i32,
) -> CrtHits {
    let a = (clamp_roll(modified_attacker_roll) - 1) as usize;
    let d = (clamp_roll(modified_defender_roll) - 1) as usize;
    dense().tiers[tier.index()][a][d]
}

/// Largest value in the hits-to-defender column for `tier`.
pub fn max_hits_to_defender(tier: BattleSizeTier) -> u32 {
    column_max(&HITS_TO_DEFENDER[tier.index()])
}

/// Largest value in the hits-to-attacker column for `tier`.
pub fn max_hits_to_attacker(tier: BattleSizeTier) -> u32 {
    column_max(&HITS_TO_ATTACKER[tier.index()])
}

fn column_max(column: &[u8; ROWS]) -> u32 {
    column.iter().copied().max().map(u32::from).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_table_matches_columns_for_every_cell() {
        for tier in BattleSizeTier::ALL {
            for a in 1..=MAX_MODIFIED_ROLL {
                for d in 1..=MAX_MODIFIED_ROLL {
                    let hits = lookup(tier, a, d);
                    let t = tier.index();
                    assert_eq!(hits.to_defender, HITS_TO_DEFENDER[t][(a - 1) as usize]);
                    assert_eq!(hits.to_attacker, HITS_TO_ATTACKER[t][(d - 1) as usize]);
                }
            }
        }
    }

    #[test]
    fn out_of_range_rolls_clamp_to_table_edges() {
        let tier = BattleSizeTier::Large;
        assert_eq!(lookup(tier, -3, 0), lookup(tier, 1, 1));
        assert_eq!(lookup(tier, 17, 25), lookup(tier, 10, 10));
        assert_eq!(lookup(tier, 17, 25).to_attacker, 6);
    }

    #[test]
    fn column_maxima_per_tier() {
        assert_eq!(max_hits_to_defender(BattleSizeTier::Small), 1);
        assert_eq!(max_hits_to_attacker(BattleSizeTier::Small), 2);
        assert_eq!(max_hits_to_defender(BattleSizeTier::Medium), 3);
        assert_eq!(max_hits_to_attacker(BattleSizeTier::Medium), 3);
        assert_eq!(max_hits_to_defender(BattleSizeTier::Large), 5);
        assert_eq!(max_hits_to_attacker(BattleSizeTier::Large), 6);
    }

    #[test]
    fn concurrent_first_access_sees_one_table() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| lookup(BattleSizeTier::Medium, 10, 7)))
            .collect();
        for handle in handles {
            let hits = handle.join().expect("lookup thread panicked");
            assert_eq!(hits, CrtHits { to_defender: 3, to_attacker: 2 });
        }
    }
}
