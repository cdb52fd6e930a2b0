pub mod aggregate;
pub mod exact;
pub mod monte_carlo;
pub mod vectorized;

pub use aggregate::{AggregateStats, HitStats, HitSummary, TrialColumns};
pub use exact::{enumerate_outcomes, exact_stats, PINNED_LEADER_DEATH_ROLL};
pub use monte_carlo::{
    run_monte_carlo, run_monte_carlo_parallel, run_preset, simulate_trials, trials_for_exponent,
    MonteCarloPreset, MonteCarloRun, MAX_TRIALS_EXPONENT, TRIAL_SHARDS,
};
pub use vectorized::{distribution, mean_and_std_dev, sum, MeanStdDev};
