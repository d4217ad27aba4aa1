//! Nano Work Prover Library
//!
//! Proof-of-work generation for block-lattice ledgers that rate-limit
//! transactions with BLAKE2b work.
//!
//! # Overview
//!
//! A work value is the 8-byte BLAKE2b digest of `nonce (LE) || root`, read as
//! a little-endian integer. A nonce is valid for a root when its work value is
//! at least the difficulty threshold. Finding one is a random search: draw a
//! batch start from a xorshift1024* stream, evaluate 2^20 consecutive
//! candidates on the selected backend, repeat until one qualifies.
//!
//! # Features
//!
//! - **Two backends**: a multi-core CPU engine and an OpenCL engine
//!   (`opencl` feature), chosen at runtime with GPU preferred
//! - **Specialized kernel**: the GPU code is generated from the same message
//!   layout the host uses and checked against shared reference vectors
//! - **No silent defaults**: backend and device problems are errors, never a
//!   zero nonce
//!
//! # Example
//!
//! ```rust
//! use nanowork::{validate, WorkGenerator, EngineConfig, BackendChoice};
//!
//! let config = EngineConfig {
//!     backend: BackendChoice::Cpu,
//!     threads: Some(2),
//!     ..EngineConfig::default()
//! };
//! let mut generator = WorkGenerator::new(&config).unwrap();
//!
//! let root = [0x42u8; 32];
//! let difficulty = 0xff00_0000_0000_0000;
//! let work = generator.generate(&root, difficulty).unwrap();
//!
//! assert!(validate(work, &root, difficulty).unwrap());
//! ```

// Re-export the core algorithm
pub use nanowork_core as algorithm;

pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod hash;

mod entropy;

// Convenience re-exports
pub use algorithm::{
    from_multiplier, to_multiplier, BASE_DIFFICULTY, RECEIVE_DIFFICULTY, SEND_DIFFICULTY,
};
pub use config::{BackendChoice, ConfigError, EngineConfig};
pub use engine::{BackendKind, WorkEngine};
pub use error::WorkError;
pub use generator::{generate, validate, work_value, SearchStats, WorkGenerator};
