use std::num::NonZeroUsize;
use std::thread;

use clap::{Parser, ValueEnum};

use crate::estimator::RngSource;
use crate::harness::DEFAULT_MAX_EXPONENT;

/// Which worker pool runs the parallel phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Persistent OS threads
    Threads,
    /// Blocking tasks on a tokio runtime
    Tokio,
}

/// Estimate pi serially and across a worker pool, comparing timings
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Number of workers in the pool (defaults to available parallelism)
    #[arg(short, long)]
    pub workers: Option<NonZeroUsize>,

    /// Worker pool implementation
    #[arg(short, long, value_enum, default_value_t = Backend::Threads)]
    pub backend: Backend,

    /// Seed for reproducible runs (OS entropy when omitted)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Largest power of ten to sample
    #[arg(long, default_value_t = DEFAULT_MAX_EXPONENT, value_parser = clap::value_parser!(u32).range(0..=12))]
    pub max_exponent: u32,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn worker_count(&self) -> usize {
        self.workers
            .or_else(|| thread::available_parallelism().ok())
            .map_or(1, NonZeroUsize::get)
    }

    pub fn rng_source(&self) -> RngSource {
        match self.seed {
            Some(seed) => RngSource::seeded(seed),
            None => RngSource::entropy(),
        }
    }

    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["montecarlo_pi"]).unwrap();
        assert_eq!(cli.backend, Backend::Threads);
        assert_eq!(cli.max_exponent, 7);
        assert_eq!(cli.rng_source(), RngSource::entropy());
        assert_eq!(cli.log_level(), "warn");
        assert!(cli.worker_count() >= 1);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "montecarlo_pi",
            "-w",
            "4",
            "--backend",
            "tokio",
            "--seed",
            "42",
            "--max-exponent",
            "5",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.worker_count(), 4);
        assert_eq!(cli.backend, Backend::Tokio);
        assert_eq!(cli.rng_source(), RngSource::seeded(42));
        assert_eq!(cli.max_exponent, 5);
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(Cli::try_parse_from(["montecarlo_pi", "--workers", "0"]).is_err());
    }

    #[test]
    fn test_exponent_bounded() {
        assert!(Cli::try_parse_from(["montecarlo_pi", "--max-exponent", "13"]).is_err());
    }
}
