//! xorshift1024* generator for batch start nonces
//!
//! Period 2^1024 - 1. Not cryptographic: it only spreads batch starting points
//! over the nonce space so that independent searches rarely overlap.

/// Output multiplier of xorshift1024*
pub const MULTIPLIER: u64 = 1_181_783_497_276_652_981;

/// Replacement for word 0 when a seed is entirely zero
const NONZERO_FILL: u64 = 0x9E37_79B9_7F4A_7C15;

/// xorshift1024* state: 16 words and a rotation index
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XorShift1024Star {
    state: [u64; 16],
    index: usize,
}

impl XorShift1024Star {
    /// Create a generator from explicit state, starting at rotation index 0
    pub fn from_state(state: [u64; 16]) -> Self {
        let mut rng = Self {
            state: [0; 16],
            index: 0,
        };
        rng.reseed(state);
        rng
    }

    /// Replace the state words, keeping the rotation index
    ///
    /// The all-zero state is a fixed point of the transition, so it is patched
    /// to a non-zero state.
    pub fn reseed(&mut self, state: [u64; 16]) {
        self.state = state;
        if self.state.iter().all(|&word| word == 0) {
            self.state[0] = NONZERO_FILL;
        }
    }

    /// Current state words
    pub fn state(&self) -> &[u64; 16] {
        &self.state
    }

    /// Advance the generator and return the next output
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[self.index];
        self.index = (self.index + 1) & 15;
        let mut s1 = self.state[self.index];
        s1 ^= s1 << 31;
        s1 ^= s1 >> 11;
        s1 ^= s0 ^ (s0 >> 30);
        self.state[self.index] = s1;
        s1.wrapping_mul(MULTIPLIER)
    }
}

impl Iterator for XorShift1024Star {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.next_u64())
    }
}
