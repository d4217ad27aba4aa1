//! BLAKE2b specialized to the work message
//!
//! A work message is always `nonce (8B LE) || root (32B)`, hashed unkeyed into an
//! 8-byte digest. That fits one compression block, so the whole hash reduces to
//! a single call of the compression function with:
//!
//! - message words `m[0] = nonce`, `m[1..5] = root`, `m[5..16] = 0`
//! - counter `t0 = 40`, final-block flag set
//! - output = first word of the chaining value
//!
//! The tables below are the single description of that layout. Both the host
//! [`work_value`] and the OpenCL kernel emitted by [`crate::kernel`] are driven by
//! them, and both are checked against a generic BLAKE2b implementation.

use crate::params::{ROOT_LEN, ROUNDS, WORK_DIGEST_LEN, WORK_INPUT_LEN};

/// BLAKE2b initialization vector
pub const IV: [u64; 8] = [
    0x6a09_e667_f3bc_c908,
    0xbb67_ae85_84ca_a73b,
    0x3c6e_f372_fe94_f82b,
    0xa54f_f53a_5f1d_36f1,
    0x510e_527f_ade6_82d1,
    0x9b05_688c_2b3e_6c1f,
    0x1f83_d9ab_fb41_bd6b,
    0x5be0_cd19_137e_2179,
];

/// Message word permutation per round (rounds 10 and 11 reuse rows 0 and 1)
pub const SIGMA: [[usize; 16]; ROUNDS] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
    [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
    [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
    [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
    [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
    [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
    [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
    [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
    [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
];

/// Working-vector indices `(a, b, c, d)` of the eight G applications per round:
/// four columns, then four diagonals. G number `i` consumes `SIGMA[r][2i]` and
/// `SIGMA[r][2i + 1]`.
pub const MIX_LANES: [[usize; 4]; 8] = [
    [0, 4, 8, 12],
    [1, 5, 9, 13],
    [2, 6, 10, 14],
    [3, 7, 11, 15],
    [0, 5, 10, 15],
    [1, 6, 11, 12],
    [2, 7, 8, 13],
    [3, 4, 9, 14],
];

/// G rotation amounts
pub const ROTATIONS: [u32; 4] = [32, 24, 16, 63];

/// Where a message word of the work block comes from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageWord {
    /// The candidate nonce
    Nonce,
    /// Little-endian word `i` of the root
    Root(usize),
    /// Statically zero padding
    Zero,
}

impl MessageWord {
    /// Whether the word contributes to the mixing at all
    pub const fn is_zero(self) -> bool {
        matches!(self, MessageWord::Zero)
    }
}

/// Layout of the single compression block of a work message
pub const WORK_MESSAGE: [MessageWord; 16] = {
    let mut words = [MessageWord::Zero; 16];
    words[0] = MessageWord::Nonce;
    let mut i = 0;
    while i < ROOT_LEN / 8 {
        words[1 + i] = MessageWord::Root(i);
        i += 1;
    }
    words
};

/// Parameter block word 0 for an unkeyed sequential hash: fanout 1, depth 1
pub const fn param_word(digest_len: usize) -> u64 {
    0x0101_0000 ^ digest_len as u64
}

/// First chaining word after the parameter block is applied
pub const H0: u64 = IV[0] ^ param_word(WORK_DIGEST_LEN);

/// Working vector at the start of the only (and final) work block
pub const INITIAL_STATE: [u64; 16] = initial_state(WORK_DIGEST_LEN, WORK_INPUT_LEN);

/// Build the working vector for a single final block of `input_len` bytes
pub const fn initial_state(digest_len: usize, input_len: usize) -> [u64; 16] {
    let mut v = [0u64; 16];
    let mut i = 0;
    while i < 8 {
        v[i] = IV[i];
        v[i + 8] = IV[i];
        i += 1;
    }
    v[0] ^= param_word(digest_len);
    v[12] ^= input_len as u64;
    v[14] = !v[14];
    v
}

/// Split a root into its four little-endian message words
#[inline(always)]
pub fn root_words(root: &[u8; ROOT_LEN]) -> [u64; 4] {
    let mut words = [0u64; 4];
    for (word, chunk) in words.iter_mut().zip(root.chunks_exact(8)) {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(chunk);
        *word = u64::from_le_bytes(bytes);
    }
    words
}

#[inline(always)]
fn load(word: MessageWord, nonce: u64, root: &[u64; 4]) -> u64 {
    match word {
        MessageWord::Nonce => nonce,
        MessageWord::Root(i) => root[i],
        MessageWord::Zero => 0,
    }
}

#[inline(always)]
fn g(v: &mut [u64; 16], [a, b, c, d]: [usize; 4], x: u64, y: u64) {
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(x);
    v[d] = (v[d] ^ v[a]).rotate_right(ROTATIONS[0]);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(ROTATIONS[1]);
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(y);
    v[d] = (v[d] ^ v[a]).rotate_right(ROTATIONS[2]);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(ROTATIONS[3]);
}

/// Work value of `nonce` for pre-split root words
///
/// This is the hot host-side path: the message layout is a compile-time table,
/// so the zero words fold away once the rounds are unrolled.
#[inline(always)]
pub fn work_value_words(nonce: u64, root: &[u64; 4]) -> u64 {
    let mut v = INITIAL_STATE;

    for sigma in SIGMA.iter() {
        for (lane, pair) in MIX_LANES.iter().zip(sigma.chunks_exact(2)) {
            let x = load(WORK_MESSAGE[pair[0]], nonce, root);
            let y = load(WORK_MESSAGE[pair[1]], nonce, root);
            g(&mut v, *lane, x, y);
        }
    }

    H0 ^ v[0] ^ v[8]
}

/// Work value of `nonce` against `root`
///
/// Equal to the 8-byte BLAKE2b digest of `nonce.to_le_bytes() || root`, read as a
/// little-endian integer.
///
/// # Example
///
/// ```rust
/// use nanowork_core::work_value;
///
/// assert_eq!(work_value(0, &[0u8; 32]), 0xd60f_ba25_f7d1_4965);
/// ```
pub fn work_value(nonce: u64, root: &[u8; ROOT_LEN]) -> u64 {
    work_value_words(nonce, &root_words(root))
}

/// Digest bytes of the work message (little-endian form of [`work_value`])
pub fn work_digest(nonce: u64, root: &[u8; ROOT_LEN]) -> [u8; WORK_DIGEST_LEN] {
    work_value(nonce, root).to_le_bytes()
}
