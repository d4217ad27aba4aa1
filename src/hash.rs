//! Generic BLAKE2b path for the CPU engine
//!
//! Uses the `blake2` crate's variable-output hasher rather than the unrolled
//! single-block compression in `nanowork-core`; the two are cross-checked in
//! the tests below and in the core crate.

use blake2::digest::consts::U8;
use blake2::{Blake2b, Digest};
use nanowork_core::{ROOT_LEN, WORK_DIGEST_LEN};

type Blake2b64 = Blake2b<U8>;

/// BLAKE2b-64 over `nonce (LE) || root`
#[inline]
pub fn blake2b_work_digest(nonce: u64, root: &[u8; ROOT_LEN]) -> [u8; WORK_DIGEST_LEN] {
    let mut hasher = Blake2b64::new();
    hasher.update(nonce.to_le_bytes());
    hasher.update(root);

    let mut digest = [0u8; WORK_DIGEST_LEN];
    digest.copy_from_slice(&hasher.finalize());
    digest
}

/// Work value of `nonce` computed through the generic hasher
pub fn blake2b_work_value(nonce: u64, root: &[u8; ROOT_LEN]) -> u64 {
    u64::from_le_bytes(blake2b_work_digest(nonce, root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanowork_core::vectors::REFERENCE_VECTORS;
    use nanowork_core::work_value;

    #[test]
    fn test_generic_hash_matches_reference_vectors() {
        for vector in REFERENCE_VECTORS {
            assert_eq!(
                blake2b_work_value(vector.nonce, &vector.root),
                vector.value,
                "nonce {:016x}",
                vector.nonce
            );
        }
    }

    #[test]
    fn test_generic_hash_matches_specialized_compression() {
        let mut root = [0u8; ROOT_LEN];
        for nonce in (0..200u64).map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15)) {
            root[(nonce % 32) as usize] ^= nonce as u8;
            assert_eq!(blake2b_work_value(nonce, &root), work_value(nonce, &root));
        }
    }
}
