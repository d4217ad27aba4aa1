//! Reference work vectors
//!
//! Values are the 8-byte BLAKE2b digest of `nonce (LE) || root`, read as a
//! little-endian integer. Every backend is checked against this table.

use crate::params::ROOT_LEN;

/// One `(nonce, root) -> value` reference triple
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkVector {
    /// Candidate nonce, hashed as 8 little-endian bytes
    pub nonce: u64,
    /// Root the nonce is bound to
    pub root: [u8; ROOT_LEN],
    /// Expected work value (digest read little-endian)
    pub value: u64,
}

const COUNTING_ROOT: [u8; ROOT_LEN] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,
    0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
    0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17,
    0x18, 0x19, 0x1a, 0x1b, 0x1c, 0x1d, 0x1e, 0x1f,
];

/// Public key of the ledger genesis account, the root of its open block work
pub const GENESIS_ACCOUNT: [u8; ROOT_LEN] = [
    0xe8, 0x92, 0x08, 0xdd, 0x03, 0x8f, 0xbb, 0x26,
    0x99, 0x87, 0x68, 0x96, 0x21, 0xd5, 0x22, 0x92,
    0xae, 0x9c, 0x35, 0x94, 0x1a, 0x74, 0x84, 0x75,
    0x6e, 0xcc, 0xed, 0x92, 0xa6, 0x50, 0x93, 0xba,
];

/// Hash of the ledger genesis open block
pub const GENESIS_BLOCK: [u8; ROOT_LEN] = [
    0x99, 0x1c, 0xf1, 0x90, 0x09, 0x4c, 0x00, 0xf0,
    0xb6, 0x8e, 0x2e, 0x5f, 0x75, 0xf6, 0xbe, 0xe9,
    0x5a, 0x2e, 0x0b, 0xd9, 0x3c, 0xea, 0xa4, 0xa6,
    0x73, 0x4d, 0xb9, 0xf1, 0x9b, 0x72, 0x89, 0x48,
];

/// Shared reference vectors
pub const REFERENCE_VECTORS: &[WorkVector] = &[
    WorkVector {
        nonce: 0,
        root: [0x00; ROOT_LEN],
        value: 0xd60f_ba25_f7d1_4965,
    },
    WorkVector {
        nonce: u64::MAX,
        root: [0xff; ROOT_LEN],
        value: 0x9aac_8c58_57df_52a4,
    },
    WorkVector {
        nonce: 0,
        root: [0xff; ROOT_LEN],
        value: 0x62ba_2f26_f7f2_5065,
    },
    WorkVector {
        nonce: u64::MAX,
        root: [0x00; ROOT_LEN],
        value: 0xadc4_e279_097a_3ab5,
    },
    WorkVector {
        nonce: 1,
        root: COUNTING_ROOT,
        value: 0x0528_de04_3b77_356f,
    },
    WorkVector {
        nonce: 0x0123_4567_89ab_cdef,
        root: GENESIS_BLOCK,
        value: 0xf4bb_d42a_6c92_0f6c,
    },
    // Work of the live network's genesis open block
    WorkVector {
        nonce: 0x62f0_5417_dd3f_b691,
        root: GENESIS_ACCOUNT,
        value: 0xffff_fff4_000d_3dac,
    },
];
