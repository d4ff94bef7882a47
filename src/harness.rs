//! Serial versus parallel comparison runs.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::estimator::{estimate_pi, RngSource, SampleCount};
use crate::pool::WorkerPool;

pub const SERIAL_MIN_EXPONENT: u32 = 0;
pub const PARALLEL_MIN_EXPONENT: u32 = 2;
pub const DEFAULT_MAX_EXPONENT: u32 = 7;

/// One worker's slice of a parallel estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Share {
    pub worker: usize,
    pub samples: SampleCount,
}

/// Splits `samples` evenly across `workers`, dropping the remainder.
pub fn split(samples: SampleCount, workers: usize) -> Result<Vec<Share>> {
    if workers == 0 {
        return Err(Error::EmptyPool);
    }

    let per_worker = SampleCount::new(samples.get() / workers as u64).map_err(|_| {
        Error::TooFewSamples {
            samples: samples.get(),
            workers,
        }
    })?;

    Ok((0..workers)
        .map(|worker| Share {
            worker,
            samples: per_worker,
        })
        .collect())
}

/// Unweighted arithmetic mean.
pub fn mean(estimates: &[f64]) -> f64 {
    estimates.iter().sum::<f64>() / estimates.len() as f64
}

#[derive(Debug, Clone, Copy)]
pub struct Measurement {
    pub samples: SampleCount,
    pub estimate: f64,
    pub elapsed: Duration,
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Estimation based on {} points:  {:?} Calculation time (seconds) :  {:?}",
            self.samples,
            self.estimate,
            self.elapsed.as_secs_f64()
        )
    }
}

pub struct Harness {
    rng: RngSource,
    max_exponent: u32,
}

impl Harness {
    pub fn new(rng: RngSource, max_exponent: u32) -> Self {
        Self { rng, max_exponent }
    }

    /// Estimates in-process on stream 0.
    pub fn serial_estimate(&self, samples: SampleCount) -> Measurement {
        let start = Instant::now();
        let estimate = estimate_pi(samples, &mut self.rng.stream(0));
        let elapsed = start.elapsed();

        Measurement {
            samples,
            estimate,
            elapsed,
        }
    }

    /// Scatters `samples` across the pool in one blocking call and averages
    /// the per-worker estimates.
    pub fn parallel_estimate<P: WorkerPool>(
        &self,
        pool: &P,
        samples: SampleCount,
    ) -> Result<Measurement> {
        let shares = split(samples, pool.size())?;
        let rng = self.rng;
        debug!(
            samples = samples.get(),
            workers = shares.len(),
            per_worker = shares[0].samples.get(),
            "dispatching"
        );

        let start = Instant::now();
        let estimates = pool.map_sync(
            move |share: Share| estimate_pi(share.samples, &mut rng.stream(share.worker as u64)),
            shares,
        )?;
        let elapsed = start.elapsed();

        Ok(Measurement {
            samples,
            estimate: mean(&estimates),
            elapsed,
        })
    }

    pub fn run_serial(&self, mut report: impl FnMut(&Measurement)) -> Result<Vec<Measurement>> {
        info!(
            from = SERIAL_MIN_EXPONENT,
            to = self.max_exponent,
            "serial phase"
        );

        let mut measurements = Vec::new();
        for exponent in SERIAL_MIN_EXPONENT..=self.max_exponent {
            let samples = SampleCount::new(10u64.pow(exponent))?;
            let measurement = self.serial_estimate(samples);
            report(&measurement);
            measurements.push(measurement);
        }
        Ok(measurements)
    }

    /// Sizes smaller than the pool are skipped, since some worker would get
    /// no samples.
    pub fn run_parallel<P: WorkerPool>(
        &self,
        pool: &P,
        mut report: impl FnMut(&Measurement),
    ) -> Result<Vec<Measurement>> {
        info!(
            from = PARALLEL_MIN_EXPONENT,
            to = self.max_exponent,
            workers = pool.size(),
            "parallel phase"
        );

        let mut measurements = Vec::new();
        for exponent in PARALLEL_MIN_EXPONENT..=self.max_exponent {
            let samples = SampleCount::new(10u64.pow(exponent))?;
            if samples.get() < pool.size() as u64 {
                warn!(
                    samples = samples.get(),
                    workers = pool.size(),
                    "skipping size smaller than the pool"
                );
                continue;
            }

            let measurement = self.parallel_estimate(pool, samples)?;
            report(&measurement);
            measurements.push(measurement);
        }
        Ok(measurements)
    }
}
