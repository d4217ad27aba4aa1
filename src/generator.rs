//! Search orchestration
//!
//! A [`WorkGenerator`] owns one engine and one xorshift1024* stream. Each
//! search reseeds the stream, then draws one batch start per round and hands
//! the batch to the engine until a winner comes back. The loop has no
//! iteration bound; difficulty alone governs how long it runs.

use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::{Duration, Instant};

use nanowork_core::{value_meets_difficulty, XorShift1024Star};

use crate::config::EngineConfig;
use crate::engine::{select_engine, BackendKind, Batch, WorkEngine, WorkJob};
use crate::entropy;
use crate::error::WorkError;
use crate::hash::blake2b_work_value;

/// Counters for one completed search
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchStats {
    pub batches: u64,
    pub hashes: u64,
    pub elapsed: Duration,
}

impl SearchStats {
    /// Hashes per second over the whole search
    pub fn hashrate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.hashes as f64 / secs
        } else {
            0.0
        }
    }
}

/// Nonce search context: one engine, one candidate stream
///
/// Not shared between threads by itself; concurrent callers either own a
/// generator each or go through the process-wide [`generate`].
pub struct WorkGenerator {
    engine: Box<dyn WorkEngine>,
    rng: XorShift1024Star,
    last_stats: Option<SearchStats>,
}

impl WorkGenerator {
    /// Pick and initialize a backend from `config`
    pub fn new(config: &EngineConfig) -> Result<Self, WorkError> {
        Ok(Self::with_engine(select_engine(config)?))
    }

    pub fn with_engine(engine: Box<dyn WorkEngine>) -> Self {
        Self {
            engine,
            rng: XorShift1024Star::from_state(entropy::seed_state()),
            last_stats: None,
        }
    }

    pub fn backend(&self) -> BackendKind {
        self.engine.kind()
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Statistics of the most recent successful search
    pub fn last_stats(&self) -> Option<SearchStats> {
        self.last_stats
    }

    /// Find a nonce for `root` meeting `difficulty`
    ///
    /// Blocks until a winner is found. The root is checked before the
    /// candidate stream is touched.
    pub fn generate(&mut self, root: &[u8], difficulty: u64) -> Result<u64, WorkError> {
        let job = WorkJob::new(root, difficulty)?;
        self.rng.reseed(entropy::seed_state());
        self.search(&job)
    }

    /// Same as [`generate`](Self::generate) with a caller-chosen stream seed
    ///
    /// Unlike `generate`, which reseeds the words and keeps the rotation
    /// index, this restarts the stream at index 0. The batch starts then
    /// depend only on `seed`, not on earlier searches with this generator.
    pub fn generate_seeded(
        &mut self,
        root: &[u8],
        difficulty: u64,
        seed: [u64; 16],
    ) -> Result<u64, WorkError> {
        let job = WorkJob::new(root, difficulty)?;
        self.rng = XorShift1024Star::from_state(seed);
        self.search(&job)
    }

    fn search(&mut self, job: &WorkJob) -> Result<u64, WorkError> {
        let started = Instant::now();
        let mut stats = SearchStats::default();

        self.engine.prepare(job)?;

        loop {
            let batch = Batch::at(self.rng.next_u64());
            let outcome = self.engine.evaluate(job, batch)?;
            stats.batches += 1;
            stats.hashes += outcome.hashes;

            log::trace!(
                "batch {} from {:016x}: {} hashes",
                stats.batches,
                batch.start,
                outcome.hashes
            );

            if let Some(nonce) = outcome.winner {
                stats.elapsed = started.elapsed();
                log::debug!(
                    "{}: work {:016x} after {} batches, {} hashes in {:.3}s",
                    self.engine.name(),
                    nonce,
                    stats.batches,
                    stats.hashes,
                    stats.elapsed.as_secs_f64()
                );
                self.last_stats = Some(stats);
                return Ok(nonce);
            }
        }
    }
}

static GENERATOR: OnceLock<Result<Mutex<WorkGenerator>, WorkError>> = OnceLock::new();

/// Find a nonce using the process-wide generator
///
/// The generator is built from the default configuration on first use.
/// If that fails, every call reports the same initialization error. Calls
/// from several threads are serialized.
pub fn generate(root: &[u8], difficulty: u64) -> Result<u64, WorkError> {
    // Reject bad input without bringing a backend up
    WorkJob::new(root, difficulty)?;

    let generator = GENERATOR
        .get_or_init(|| WorkGenerator::new(&EngineConfig::default()).map(Mutex::new))
        .as_ref()
        .map_err(Clone::clone)?;

    generator
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .generate(root, difficulty)
}

/// Check a nonce against a root and difficulty with the generic hash
pub fn validate(nonce: u64, root: &[u8], difficulty: u64) -> Result<bool, WorkError> {
    Ok(value_meets_difficulty(work_value(nonce, root)?, difficulty))
}

/// Work value of `nonce` for `root`
pub fn work_value(nonce: u64, root: &[u8]) -> Result<u64, WorkError> {
    let job = WorkJob::new(root, 0)?;
    Ok(blake2b_work_value(nonce, job.root()))
}
