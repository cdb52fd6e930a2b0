//! Splitting a trial budget into contiguous shards.
//!
//! The parallel Monte Carlo runner resolves each shard with its own die
//! stream and concatenates the per-trial columns in shard order.

use std::ops::Range;

/// Split `total` trials into up to `shards` contiguous ranges.
/// Ranges differ in length by at most one; earlier ranges take the extra trial.
///
/// # Example
/// ```
/// # use antietam::parallel::trial_shards;
/// let shards = trial_shards(10, 3);
/// assert_eq!(shards, vec![0..4, 4..7, 7..10]);
/// ```
pub fn trial_shards(total: usize, shards: usize) -> Vec<Range<usize>> {
    if total == 0 || shards == 0 {
        return Vec::new();
    }
    let shards = shards.min(total);
    let base = total / shards;
    let remainder = total % shards;

    let mut start = 0;
    (0..shards)
        .map(|i| {
            let end = start + base + usize::from(i < remainder);
            let range = start..end;
            start = end;
            range
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_of_two_budget_splits_evenly() {
        let shards = trial_shards(1 << 12, 64);
        assert_eq!(shards.len(), 64);
        assert!(shards.iter().all(|r| r.len() == 64));
        assert_eq!(shards.last().map(|r| r.end), Some(4096));
    }

    #[test]
    fn remainder_goes_to_leading_shards() {
        assert_eq!(trial_shards(10, 3), vec![0..4, 4..7, 7..10]);
    }

    #[test]
    fn fewer_trials_than_shards() {
        assert_eq!(trial_shards(2, 64), vec![0..1, 1..2]);
    }

    #[test]
    fn empty_inputs() {
        assert!(trial_shards(0, 5).is_empty());
        assert!(trial_shards(10, 0).is_empty());
    }
}
