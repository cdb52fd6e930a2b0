//! Runtime settings read from the environment.
//!
//! | variable                   | default          |
//! |----------------------------|------------------|
//! | `ANTIETAM_BIND`            | `127.0.0.1:3000` |
//! | `ANTIETAM_TRIALS_EXPONENT` | `14`             |
//! | `ANTIETAM_WORKERS`         | `0` (all cores)  |
//! | `ANTIETAM_LOG`             | `antietam=info`  |

use std::env;
use std::str::FromStr;

use crate::parallel::WorkerPool;
use crate::stats::{MonteCarloPreset, MAX_TRIALS_EXPONENT};

pub const BIND_VAR: &str = "ANTIETAM_BIND";
pub const TRIALS_EXPONENT_VAR: &str = "ANTIETAM_TRIALS_EXPONENT";
pub const WORKERS_VAR: &str = "ANTIETAM_WORKERS";
pub const LOG_VAR: &str = "ANTIETAM_LOG";

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_LOG_FILTER: &str = "antietam=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    /// Used when a Monte Carlo request does not name an exponent.
    pub trials_exponent: u32,
    pub pool: WorkerPool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND.to_string(),
            trials_exponent: MonteCarloPreset::Standard.trials_exponent(),
            pool: WorkerPool::default(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds settings from any variable lookup. Unparseable values are
    /// logged and replaced by the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let trials_exponent = parse_or(&lookup, TRIALS_EXPONENT_VAR, defaults.trials_exponent);
        let trials_exponent = if trials_exponent > MAX_TRIALS_EXPONENT {
            tracing::warn!(
                trials_exponent,
                max = MAX_TRIALS_EXPONENT,
                "trials exponent too large, using default"
            );
            defaults.trials_exponent
        } else {
            trials_exponent
        };

        Self {
            bind_addr: lookup(BIND_VAR).unwrap_or(defaults.bind_addr),
            trials_exponent,
            pool: WorkerPool::with_workers(parse_or(&lookup, WORKERS_VAR, defaults.pool.workers)),
        }
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(name) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(variable = name, value = %raw, %default, "invalid setting, using default");
            default
        }),
    }
}

/// Log filter directive from `ANTIETAM_LOG`, or the default.
pub fn log_filter() -> String {
    env::var(LOG_VAR).unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(Settings::from_lookup(|_| None), Settings::default());
    }

    #[test]
    fn values_are_read_and_trimmed() {
        let settings = Settings::from_lookup(lookup_from(&[
            (BIND_VAR, "0.0.0.0:8080"),
            (TRIALS_EXPONENT_VAR, " 17 "),
            (WORKERS_VAR, "4"),
        ]));
        assert_eq!(settings.bind_addr, "0.0.0.0:8080");
        assert_eq!(settings.trials_exponent, 17);
        assert_eq!(settings.pool.workers, 4);
    }

    #[test]
    fn invalid_values_fall_back() {
        let settings = Settings::from_lookup(lookup_from(&[
            (TRIALS_EXPONENT_VAR, "40"),
            (WORKERS_VAR, "many"),
        ]));
        assert_eq!(settings.trials_exponent, 14);
        assert_eq!(settings.pool.workers, 0);
    }
}
