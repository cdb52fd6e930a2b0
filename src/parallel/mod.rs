pub mod batch;
pub mod pool;

pub use batch::trial_shards;
pub use pool::WorkerPool;
