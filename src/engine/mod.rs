//! Work engines: the batch-evaluation backends behind the search loop
//!
//! The orchestrator depends only on [`WorkEngine`]. An engine receives a job
//! once per search ([`WorkEngine::prepare`]) and then one [`Batch`] at a time,
//! answering with the winner it found, if any. Batches never yield partial
//! results; polling granularity is exactly one batch.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use nanowork_core::{root_words, ROOT_LEN, WORK_BATCH_SIZE};
use serde::{Deserialize, Serialize};

use crate::codec::root_from_slice;
use crate::error::WorkError;

pub mod cpu;
#[cfg(feature = "opencl")]
pub mod gpu;
mod select;

pub use select::{gpu_device_count, select_engine};

/// Backend family of an engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Gpu,
    Cpu,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Gpu => f.write_str("gpu"),
            BackendKind::Cpu => f.write_str("cpu"),
        }
    }
}

/// One search request: immutable for the whole search
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkJob {
    root: [u8; ROOT_LEN],
    root_words: [u64; 4],
    difficulty: u64,
}

impl WorkJob {
    /// Validate the root and build a job
    pub fn new(root: &[u8], difficulty: u64) -> Result<Self, WorkError> {
        let root = root_from_slice(root)?;
        Ok(Self {
            root_words: root_words(&root),
            root,
            difficulty,
        })
    }

    pub fn root(&self) -> &[u8; ROOT_LEN] {
        &self.root
    }

    /// Root as four little-endian words, the layout the kernel consumes
    pub fn root_words(&self) -> &[u64; 4] {
        &self.root_words
    }

    pub fn difficulty(&self) -> u64 {
        self.difficulty
    }
}

/// A contiguous run of candidates `start, start + 1, ...` (wrapping at 2^64)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Batch {
    pub start: u64,
    pub size: u64,
}

impl Batch {
    /// Standard-size batch starting at `start`
    pub fn at(start: u64) -> Self {
        Self {
            start,
            size: WORK_BATCH_SIZE,
        }
    }

    #[inline(always)]
    pub fn candidate(&self, offset: u64) -> u64 {
        self.start.wrapping_add(offset)
    }

    /// Split into at most `parts` contiguous sub-batches of near-equal size
    pub fn split(&self, parts: usize) -> Vec<Batch> {
        let parts = (parts.max(1) as u64).min(self.size.max(1));
        let base = self.size / parts;
        let extra = self.size % parts;

        let mut offset = 0u64;
        (0..parts)
            .map(|i| {
                let size = base + u64::from(i < extra);
                let part = Batch {
                    start: self.candidate(offset),
                    size,
                };
                offset += size;
                part
            })
            .filter(|part| part.size > 0)
            .collect()
    }
}

/// Result of evaluating one batch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub winner: Option<u64>,
    /// Candidates actually hashed (the whole batch for device engines)
    pub hashes: u64,
}

/// Shared cell receiving a satisfying nonce during one batch
///
/// Writers race with last-writer-wins semantics: any satisfying nonce is a
/// correct answer, so the only requirement is that the 64-bit value is never
/// torn. `0` is the empty sentinel, so nonce 0 can never be reported as a
/// winner; engines skip it as a candidate.
#[derive(Debug, Default)]
pub struct WinnerSlot(AtomicU64);

impl WinnerSlot {
    pub const EMPTY: u64 = 0;

    pub fn new() -> Self {
        Self(AtomicU64::new(Self::EMPTY))
    }

    pub fn record(&self, nonce: u64) {
        self.0.store(nonce, Ordering::Release);
    }

    pub fn get(&self) -> Option<u64> {
        match self.0.load(Ordering::Acquire) {
            Self::EMPTY => None,
            nonce => Some(nonce),
        }
    }
}

/// Batch-evaluation backend
///
/// Implementations must:
/// - Only report nonces whose work value meets the job's difficulty.
/// - Surface device problems as errors rather than as an empty batch.
pub trait WorkEngine: Send {
    /// Human-readable engine name (for logs)
    fn name(&self) -> &'static str;

    fn kind(&self) -> BackendKind;

    /// Upload per-search state; called once before the first batch of a job
    fn prepare(&mut self, _job: &WorkJob) -> Result<(), WorkError> {
        Ok(())
    }

    /// Evaluate every candidate of `batch`, stopping early once a winner is found
    fn evaluate(&mut self, job: &WorkJob, batch: Batch) -> Result<BatchOutcome, WorkError>;
}
