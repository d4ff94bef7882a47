use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};
use tokio::task;
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::pool::{check_inputs, WorkerPool};

/// Engines backed by the blocking thread pool of a private tokio runtime.
///
/// The runtime is capped at `size` blocking threads so at most `size` shares
/// run at once. `map_sync` must not be called from inside another runtime.
pub struct TokioPool {
    runtime: Runtime,
    size: usize,
}

impl TokioPool {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::EmptyPool);
        }

        let runtime = Builder::new_multi_thread()
            .worker_threads(size)
            .max_blocking_threads(size)
            .thread_name("pi-engine")
            .enable_all()
            .build()?;

        debug!(size, "tokio pool started");
        Ok(Self { runtime, size })
    }
}

impl WorkerPool for TokioPool {
    fn size(&self) -> usize {
        self.size
    }

    fn map_sync<T, R, F>(&self, f: F, inputs: Vec<T>) -> Result<Vec<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        check_inputs(self.size, inputs.len())?;

        let f = Arc::new(f);
        self.runtime.block_on(async move {
            let handles: Vec<_> = inputs
                .into_iter()
                .map(|input| {
                    let f = Arc::clone(&f);
                    task::spawn_blocking(move || f(input))
                })
                .collect();

            let mut results = Vec::with_capacity(handles.len());
            for (id, handle) in handles.into_iter().enumerate() {
                let result = handle.await.map_err(|e| {
                    error!(worker = id, error = %e, "engine task failed");
                    Error::WorkerLost(id)
                })?;
                results.push(result);
            }

            Ok::<_, Error>(results)
        })
    }
}
