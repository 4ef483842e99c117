/// Thread pool setup for per-file rewriting.
/// Translation units are independent, so each one runs on its own rayon task.

use anyhow::{Context, Result};

/// Initialize the global rayon thread pool.
/// `jobs` overrides the worker count; by default one worker per core.
pub fn init_thread_pool(jobs: Option<usize>) -> Result<usize> {
    let cores = num_cpus::get();
    let workers = std::cmp::max(1, jobs.unwrap_or(cores));

    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()
        .context("Failed to initialize rayon thread pool")?;

    tracing::debug!(workers, cores, "initialized thread pool");

    Ok(workers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_thread_pool_once() {
        // The global pool can only be built once per process; a second call
        // must report an error instead of panicking.
        let first = init_thread_pool(Some(2));
        let second = init_thread_pool(Some(2));
        assert!(first.is_ok() || second.is_err());
        assert!(second.is_err());
    }
}
