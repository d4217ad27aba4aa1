//! # nanowork core
//!
//! Algorithm core of the BLAKE2b proof-of-work used to rate-limit ledger
//! blocks: a 64-bit nonce is valid for a 32-byte root when the 8-byte BLAKE2b
//! digest of `nonce || root`, read little-endian, is at least the difficulty.
//!
//! ## Contents
//!
//! - **Work schedule**: the single-block BLAKE2b layout of a work message, as
//!   tables ([`blake2b`])
//! - **Specialized work value**: host evaluation of that schedule ([`work_value`])
//! - **Kernel source**: the OpenCL program generated from the same tables
//!   ([`kernel::opencl_source`])
//! - **Difficulty**: comparator and multiplier conversion ([`difficulty`])
//! - **xorshift1024\***: batch start generator ([`XorShift1024Star`])
//! - **Reference vectors**: shared by every backend's tests ([`vectors`])
//!
//! ## Input Format
//!
//! ```text
//! message = nonce || root
//!           ^^^^^    ^^^^
//!           8 bytes  32 bytes
//!           (LE u64)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use nanowork_core::{meets_difficulty, work_digest, RECEIVE_DIFFICULTY};
//!
//! let root = [0u8; 32];
//! let digest = work_digest(42, &root);
//!
//! if meets_difficulty(&digest, RECEIVE_DIFFICULTY) {
//!     println!("42 is valid work for this root");
//! }
//! ```
//!
//! ## no_std Support
//!
//! ```toml
//! [dependencies]
//! nanowork-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod blake2b;
pub mod difficulty;
pub mod kernel;
mod params;
pub mod vectors;
mod xorshift;

pub use blake2b::{root_words, work_digest, work_value, work_value_words};
pub use difficulty::{from_multiplier, meets_difficulty, to_multiplier, value_meets_difficulty};
pub use params::*;
pub use xorshift::{MULTIPLIER as XORSHIFT_MULTIPLIER, XorShift1024Star};

#[cfg(test)]
mod tests;
