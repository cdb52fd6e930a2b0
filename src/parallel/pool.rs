//! Rayon thread pool configuration for Monte Carlo workloads.
//!
//! Use [WorkerPool::install] to run the sharded Monte Carlo runner with a
//! fixed number of threads, or rely on Rayon's default (all CPU cores).

use rayon::ThreadPoolBuilder;

/// How many worker threads resolve trial shards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerPool {
    /// Number of worker threads. If 0, use the global Rayon pool.
    pub workers: usize,
}

impl WorkerPool {
    /// Use exactly `n` worker threads.
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Run `f` on a pool with this worker count. With 0 workers, or if a
    /// dedicated pool cannot be built, `f` runs on the global Rayon pool.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return f();
        }
        match ThreadPoolBuilder::new().num_threads(self.workers).build() {
            Ok(pool) => pool.install(f),
            Err(err) => {
                tracing::warn!(workers = self.workers, %err, "falling back to global rayon pool");
                f()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedicated_pool_has_requested_thread_count() {
        let threads = WorkerPool::with_workers(3).install(rayon::current_num_threads);
        assert_eq!(threads, 3);
    }

    #[test]
    fn default_pool_uses_global_rayon() {
        let pool = WorkerPool::default();
        assert_eq!(pool.workers, 0);
        assert_eq!(pool.install(|| 41 + 1), 42);
    }
}
