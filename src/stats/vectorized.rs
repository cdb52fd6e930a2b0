//! Reductions over flat per-trial columns.
//!
//! Inputs are unsigned, so a negative tally cannot reach these functions.
//! The hot loops walk fixed 8-lane chunks with independent accumulators,
//! which the compiler turns into SIMD adds, then finish the tail scalar.

use crate::error::{Error, Result};

/// Lanes per chunk; 8 x u64 fills a 512-bit register.
pub const LANES: usize = 8;

/// Upper bound on the top bin accepted by [distribution].
pub const MAX_DISTRIBUTION_BIN: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeanStdDev {
    pub mean: f64,
    pub std_dev: f64,
}

/// Total of all elements, accumulated in u64.
pub fn sum<T>(values: &[T]) -> u64
where
    T: Copy + Into<u64>,
{
    let chunks = values.chunks_exact(LANES);
    let tail = chunks.remainder();

    let mut lanes = [0_u64; LANES];
    for chunk in chunks {
        for (lane, &v) in lanes.iter_mut().zip(chunk) {
            *lane += Into::<u64>::into(v);
        }
    }

    lanes.iter().sum::<u64>() + tail.iter().map(|&v| Into::<u64>::into(v)).sum::<u64>()
}

/// Population mean and standard deviation in one pass over Σx and Σx².
/// Σx² is kept in u128 so large hit counts cannot overflow it.
/// Returns zeros for an empty slice.
pub fn mean_and_std_dev<T>(values: &[T]) -> MeanStdDev
where
    T: Copy + Into<u64>,
{
    if values.is_empty() {
        return MeanStdDev::default();
    }

    let chunks = values.chunks_exact(LANES);
    let tail = chunks.remainder();

    let mut sums = [0_u64; LANES];
    let mut squares = [0_u128; LANES];
    for chunk in chunks {
        for ((s, sq), &v) in sums.iter_mut().zip(squares.iter_mut()).zip(chunk) {
            let v: u64 = v.into();
            *s += v;
            *sq += u128::from(v) * u128::from(v);
        }
    }

    let mut total: u64 = sums.iter().sum();
    let mut total_squares: u128 = squares.iter().sum();
    for &v in tail {
        let v: u64 = v.into();
        total += v;
        total_squares += u128::from(v) * u128::from(v);
    }

    let n = values.len() as f64;
    let mean = total as f64 / n;
    // Rounding can push an exact zero variance slightly negative.
    let variance = (total_squares as f64 / n - mean * mean).max(0.0);

    MeanStdDev {
        mean,
        std_dev: variance.sqrt(),
    }
}

/// Probability of each value `0..=max`; values above `max` land in the top
/// bin. Empty input gives an empty vector.
pub fn distribution<T>(values: &[T], max: usize) -> Result<Vec<f64>>
where
    T: Copy + Into<u64>,
{
    if max > MAX_DISTRIBUTION_BIN {
        return Err(Error::DistributionTooWide {
            max,
            limit: MAX_DISTRIBUTION_BIN,
        });
    }
    if values.is_empty() {
        return Ok(Vec::new());
    }

    let top = max as u64;
    let mut counts = vec![0_u64; max + 1];
    for &v in values {
        let v: u64 = v.into();
        counts[v.min(top) as usize] += 1;
    }

    let n = values.len() as f64;
    Ok(counts.into_iter().map(|c| c as f64 / n).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_mean_std(values: &[u32]) -> (f64, f64) {
        let n = values.len() as f64;
        let mean = values.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
        let var = values
            .iter()
            .map(|&v| (f64::from(v) - mean).powi(2))
            .sum::<f64>()
            / n;
        (mean, var.sqrt())
    }

    #[test]
    fn sum_handles_empty_and_ragged_lengths() {
        assert_eq!(sum::<u32>(&[]), 0);
        for len in [1, 7, 8, 9, 31, 64, 100] {
            let values: Vec<u32> = (1..=len).collect();
            assert_eq!(sum(&values), u64::from(len) * u64::from(len + 1) / 2);
        }
    }

    #[test]
    fn sum_widens_past_u32() {
        let values = vec![u32::MAX; 17];
        assert_eq!(sum(&values), u64::from(u32::MAX) * 17);
    }

    #[test]
    fn mean_and_std_dev_empty_is_zero() {
        assert_eq!(mean_and_std_dev::<u8>(&[]), MeanStdDev::default());
    }

    #[test]
    fn mean_and_std_dev_matches_two_pass_reference() {
        let values: Vec<u32> = (0..1003).map(|i| (i * 7919) % 13).collect();
        let (mean, std_dev) = naive_mean_std(&values);
        let got = mean_and_std_dev(&values);
        assert!((got.mean - mean).abs() < 1e-12);
        assert!((got.std_dev - std_dev).abs() < 1e-9);
    }

    #[test]
    fn constant_column_has_zero_std_dev() {
        let got = mean_and_std_dev(&[3_u8; 36]);
        assert_eq!(got.mean, 3.0);
        assert_eq!(got.std_dev, 0.0);
    }

    #[test]
    fn squares_of_large_values_do_not_overflow() {
        let got = mean_and_std_dev(&[u32::MAX; 20]);
        assert_eq!(got.mean, f64::from(u32::MAX));
        assert_eq!(got.std_dev, 0.0);

        let got = mean_and_std_dev(&[0, u32::MAX, 0, u32::MAX, 0, u32::MAX, 0, u32::MAX, 0, u32::MAX]);
        let half = f64::from(u32::MAX) / 2.0;
        assert!((got.mean - half).abs() < 1e-3);
        assert!((got.std_dev - half).abs() / half < 1e-9);
    }

    #[test]
    fn distribution_clamps_into_top_bin() {
        let values: [u32; 8] = [0, 1, 1, 2, 5, 9, 2, 0];
        let dist = distribution(&values, 2).expect("small max is valid");
        assert_eq!(dist, vec![0.25, 0.25, 0.5]);
        assert!((dist.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn distribution_rejects_oversized_max() {
        let err = distribution(&[1_u8], MAX_DISTRIBUTION_BIN + 1).expect_err("too wide");
        assert_eq!(
            err,
            Error::DistributionTooWide {
                max: 1025,
                limit: 1024
            }
        );
    }

    #[test]
    fn distribution_of_empty_input_is_empty() {
        assert!(distribution::<u8>(&[], 6).expect("valid max").is_empty());
    }
}
