//! Monte Carlo estimation of pi, run serially and across a worker pool.

pub mod async_pool;
pub mod config;
pub mod error;
pub mod estimator;
pub mod harness;
pub mod pool;

pub use async_pool::TokioPool;
pub use error::{Error, Result};
pub use estimator::{estimate_pi, RngSource, SampleCount};
pub use harness::{Harness, Measurement, Share};
pub use pool::{ThreadPool, WorkerPool};
