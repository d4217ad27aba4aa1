//! Multi-core CPU engine
//!
//! Each batch is split into contiguous sub-ranges, one per worker thread of a
//! dedicated rayon pool (fork-join per batch). Workers hash candidates with the
//! generic BLAKE2b primitive and check a shared stop flag before every
//! candidate, so a winner in one sub-range stops the others within one hash.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use nanowork_core::meets_difficulty;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::engine::{BackendKind, Batch, BatchOutcome, WinnerSlot, WorkEngine, WorkJob};
use crate::error::WorkError;
use crate::hash::blake2b_work_digest;

/// CPU engine backed by a fixed-size worker pool
pub struct CpuEngine {
    pool: ThreadPool,
    threads: usize,
}

impl CpuEngine {
    /// Create an engine with `threads` workers
    ///
    /// Zero threads means there is nothing to run the search on.
    pub fn new(threads: usize) -> Result<Self, WorkError> {
        if threads == 0 {
            return Err(WorkError::BackendUnavailable(
                "CPU backend configured with zero threads".to_string(),
            ));
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("nanowork-cpu-{i}"))
            .build()
            .map_err(|e| WorkError::BackendUnavailable(format!("CPU thread pool: {e}")))?;

        log::info!("CPU engine initialized with {} threads", threads);
        Ok(Self { pool, threads })
    }

    /// One worker per logical core
    pub fn with_all_cores() -> Result<Self, WorkError> {
        Self::new(num_cpus::get())
    }

    pub fn threads(&self) -> usize {
        self.threads
    }
}

/// Scan one sub-range until exhausted or stopped; returns candidates hashed
fn scan_range(
    job: &WorkJob,
    range: Batch,
    winner: &WinnerSlot,
    stop: &AtomicBool,
) -> u64 {
    let mut hashes = 0u64;

    for offset in 0..range.size {
        if stop.load(Ordering::Relaxed) {
            break;
        }

        let nonce = range.candidate(offset);
        hashes += 1;

        if nonce != WinnerSlot::EMPTY
            && meets_difficulty(&blake2b_work_digest(nonce, job.root()), job.difficulty())
        {
            winner.record(nonce);
            stop.store(true, Ordering::Relaxed);
            break;
        }
    }

    hashes
}

impl WorkEngine for CpuEngine {
    fn name(&self) -> &'static str {
        "cpu-blake2b"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Cpu
    }

    fn evaluate(&mut self, job: &WorkJob, batch: Batch) -> Result<BatchOutcome, WorkError> {
        let winner = WinnerSlot::new();
        let stop = AtomicBool::new(false);
        let hashes = AtomicU64::new(0);
        let ranges = batch.split(self.threads);

        self.pool.install(|| {
            ranges.par_iter().for_each(|range| {
                let done = scan_range(job, *range, &winner, &stop);
                hashes.fetch_add(done, Ordering::Relaxed);
            });
        });

        Ok(BatchOutcome {
            winner: winner.get(),
            hashes: hashes.into_inner(),
        })
    }
}
