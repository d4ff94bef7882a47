use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use montecarlo_pi::config::{Backend, Cli};
use montecarlo_pi::{Harness, Measurement, ThreadPool, TokioPool, WorkerPool};

fn print_measurement(measurement: &Measurement) {
    println!("{measurement}");
}

fn run_parallel<P: WorkerPool>(harness: &Harness, pool: &P) -> Result<()> {
    harness
        .run_parallel(pool, print_measurement)
        .context("parallel estimation failed")?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let workers = cli.worker_count();
    let harness = Harness::new(cli.rng_source(), cli.max_exponent);
    info!(workers, backend = ?cli.backend, seed = ?cli.seed, "starting");

    let start = Instant::now();

    print!("\n\n\n\n");
    println!("Serial Estimation of Pi");
    println!();
    harness
        .run_serial(print_measurement)
        .context("serial estimation failed")?;

    print!("\n\n\n\n");
    println!("Parallel Estimation of Pi");
    println!();
    match cli.backend {
        Backend::Threads => {
            let pool = ThreadPool::new(workers).context("failed to start thread pool")?;
            run_parallel(&harness, &pool)?;
        }
        Backend::Tokio => {
            let pool = TokioPool::new(workers).context("failed to start tokio pool")?;
            run_parallel(&harness, &pool)?;
        }
    }

    info!(total_ms = start.elapsed().as_millis() as u64, "done");
    Ok(())
}
