//! Coarse entropy for seeding the batch start generator
//!
//! The seed only needs to keep independent searches from walking the same
//! batches: OS randomness mixed with the wall clock, never cryptographic use.

use std::time::{SystemTime, UNIX_EPOCH};

/// splitmix64 step, used to spread the clock over all state words
fn splitmix64(x: &mut u64) -> u64 {
    *x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Fresh 16-word state for a new search
pub fn seed_state() -> [u64; 16] {
    let mut bytes = [0u8; 128];
    if let Err(e) = getrandom::getrandom(&mut bytes) {
        log::warn!("OS entropy unavailable ({}), seeding from the clock only", e);
    }

    let mut clock = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();

    let mut state = [0u64; 16];
    for (word, chunk) in state.iter_mut().zip(bytes.chunks_exact(8)) {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(chunk);
        *word = u64::from_le_bytes(raw) ^ splitmix64(&mut clock);
    }
    state
}
