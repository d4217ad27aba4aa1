//! Work Algorithm Parameters
//!
//! Sizes fixed by the ledger protocol's work message and by the batch/poll
//! search protocol shared by every backend.

/// Root (previous block hash or account key) length in bytes
pub const ROOT_LEN: usize = 32;

/// Nonce length in bytes
pub const NONCE_LEN: usize = 8;

/// Hashed message length: nonce || root
pub const WORK_INPUT_LEN: usize = NONCE_LEN + ROOT_LEN;

/// Digest length in bytes (one 64-bit word)
pub const WORK_DIGEST_LEN: usize = 8;

/// Candidates evaluated per batch before the orchestrator polls for a winner
pub const WORK_BATCH_SIZE: u64 = 1024 * 1024;

/// Number of BLAKE2b mixing rounds
pub const ROUNDS: usize = 12;

/// Base threshold of the live network
pub const BASE_DIFFICULTY: u64 = 0xffff_ffc0_0000_0000;

/// Threshold for send and change blocks
pub const SEND_DIFFICULTY: u64 = 0xffff_fff8_0000_0000;

/// Threshold for receive and open blocks
pub const RECEIVE_DIFFICULTY: u64 = 0xffff_fe00_0000_0000;
