//! Error types for estimation and pool dispatch

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A sample count of zero has no estimate
    #[error("sample count must be positive")]
    ZeroSamples,

    /// Splitting would hand some worker zero samples
    #[error("{samples} samples cannot be split across {workers} workers")]
    TooFewSamples { samples: u64, workers: usize },

    #[error("worker pool must have at least one worker")]
    EmptyPool,

    /// `map_sync` takes exactly one input per worker
    #[error("expected {expected} inputs for the pool, got {got}")]
    PoolSizeMismatch { expected: usize, got: usize },

    /// The worker panicked or shut down before returning its result
    #[error("worker {0} was lost before returning a result")]
    WorkerLost(usize),

    #[error("failed to start worker runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
