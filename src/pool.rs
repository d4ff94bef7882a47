//! Fixed-size worker pools and the blocking scatter/gather they expose.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, error, trace};

use crate::error::{Error, Result};

/// A fixed set of engines that can each run one function call.
///
/// The pool is built and torn down by its owner; the harness only asks for
/// its size and calls `map_sync`.
pub trait WorkerPool {
    fn size(&self) -> usize;

    /// Runs `f` on input `k` in worker `k`, blocks until every worker has
    /// answered and returns the results in worker order.
    fn map_sync<T, R, F>(&self, f: F, inputs: Vec<T>) -> Result<Vec<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + 'static;
}

pub(crate) fn check_inputs(expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(Error::PoolSizeMismatch { expected, got });
    }
    Ok(())
}

type Job = Box<dyn FnOnce() + Send + 'static>;

struct Worker {
    id: usize,
    jobs: Option<mpsc::Sender<Job>>,
    handle: Option<JoinHandle<()>>,
}

/// Persistent OS threads, each fed through its own job channel.
pub struct ThreadPool {
    workers: Vec<Worker>,
}

impl ThreadPool {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::EmptyPool);
        }

        let mut workers = Vec::with_capacity(size);
        for id in 0..size {
            let (tx, rx) = mpsc::channel::<Job>();
            let handle = thread::Builder::new()
                .name(format!("pi-worker-{id}"))
                .spawn(move || {
                    for job in rx {
                        job();
                    }
                })?;

            workers.push(Worker {
                id,
                jobs: Some(tx),
                handle: Some(handle),
            });
        }

        debug!(size, "thread pool started");
        Ok(Self { workers })
    }
}

impl WorkerPool for ThreadPool {
    fn size(&self) -> usize {
        self.workers.len()
    }

    fn map_sync<T, R, F>(&self, f: F, inputs: Vec<T>) -> Result<Vec<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        check_inputs(self.size(), inputs.len())?;

        let f = Arc::new(f);
        let (results_tx, results_rx) = mpsc::channel();

        for (worker, input) in self.workers.iter().zip(inputs) {
            let id = worker.id;
            let f = Arc::clone(&f);
            let results_tx = results_tx.clone();

            let job: Job = Box::new(move || {
                trace!(worker = id, "job started");
                // The gatherer only hangs up after an earlier error
                let _ = results_tx.send((id, f(input)));
            });

            let jobs = worker.jobs.as_ref().ok_or(Error::WorkerLost(id))?;
            jobs.send(job).map_err(|_| {
                error!(worker = id, "worker is no longer accepting jobs");
                Error::WorkerLost(id)
            })?;
        }

        // Once every job has answered or died the channel closes
        drop(results_tx);

        let mut slots: Vec<Option<R>> = self.workers.iter().map(|_| None).collect();
        for (id, result) in results_rx {
            slots[id] = Some(result);
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(id, slot)| {
                slot.ok_or_else(|| {
                    error!(worker = id, "worker died before returning a result");
                    Error::WorkerLost(id)
                })
            })
            .collect()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        for worker in &mut self.workers {
            worker.jobs.take();
        }
        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                if handle.join().is_err() {
                    debug!(worker = worker.id, "worker had panicked");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pool_rejected() {
        assert!(matches!(ThreadPool::new(0), Err(Error::EmptyPool)));
    }

    #[test]
    fn test_results_in_worker_order() {
        let pool = ThreadPool::new(4).unwrap();
        let out = pool.map_sync(|x: u64| x * 10, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(out, vec![10, 20, 30, 40]);
    }

    #[test]
    fn test_each_input_runs_on_its_own_worker() {
        let pool = ThreadPool::new(3).unwrap();
        let names = pool
            .map_sync(
                |_: ()| thread::current().name().map(str::to_owned),
                vec![(), (), ()],
            )
            .unwrap();
        assert_eq!(
            names,
            vec![
                Some("pi-worker-0".to_owned()),
                Some("pi-worker-1".to_owned()),
                Some("pi-worker-2".to_owned()),
            ]
        );
    }

    #[test]
    fn test_pool_is_reusable() {
        let pool = ThreadPool::new(2).unwrap();
        for round in 0..5u32 {
            let out = pool.map_sync(move |x: u32| x + round, vec![0, 1]).unwrap();
            assert_eq!(out, vec![round, round + 1]);
        }
    }

    #[test]
    fn test_input_count_must_match_size() {
        let pool = ThreadPool::new(2).unwrap();
        let err = pool.map_sync(|x: u8| x, vec![1, 2, 3]).unwrap_err();
        assert!(matches!(
            err,
            Error::PoolSizeMismatch {
                expected: 2,
                got: 3
            }
        ));
    }

    #[test]
    fn test_panicking_job_reports_lost_worker() {
        let pool = ThreadPool::new(2).unwrap();
        let err = pool
            .map_sync(
                |x: u8| {
                    if x == 1 {
                        panic!("engine failure");
                    }
                    x
                },
                vec![0, 1],
            )
            .unwrap_err();
        assert!(matches!(err, Error::WorkerLost(1)));

        // The dead worker stays dead
        let err = pool.map_sync(|x: u8| x, vec![0, 0]).unwrap_err();
        assert!(matches!(err, Error::WorkerLost(1)));
    }
}
