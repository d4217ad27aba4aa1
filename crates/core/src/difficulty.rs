//! Difficulty comparison and multiplier conversion
//!
//! A work digest is read as a little-endian `u64`; it is valid when it is at
//! least the difficulty threshold. Thresholds are often quoted relative to the
//! network base as a multiplier: the expected number of attempts scales with
//! `1 / (2^64 - difficulty)`.

use crate::params::WORK_DIGEST_LEN;

const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// Check if a work digest meets the difficulty threshold
///
/// # Example
///
/// ```rust
/// use nanowork_core::meets_difficulty;
///
/// let digest = 0xffff_ffc0_0000_0001u64.to_le_bytes();
/// assert!(meets_difficulty(&digest, 0xffff_ffc0_0000_0000));
/// assert!(!meets_difficulty(&digest, 0xffff_ffc0_0000_0002));
/// ```
#[inline(always)]
pub fn meets_difficulty(digest: &[u8; WORK_DIGEST_LEN], difficulty: u64) -> bool {
    value_meets_difficulty(u64::from_le_bytes(*digest), difficulty)
}

/// Check an already decoded work value against the threshold
#[inline(always)]
pub fn value_meets_difficulty(value: u64, difficulty: u64) -> bool {
    value >= difficulty
}

/// Distance of a threshold from 2^64, as a float (never zero)
fn gap(difficulty: u64) -> f64 {
    (u64::MAX - difficulty) as f64 + 1.0
}

/// Threshold that is `multiplier` times as hard as `base`
///
/// Returns `None` when the multiplier is not a positive finite number. The
/// result saturates: very small multipliers reach 0, very large ones reach
/// `u64::MAX`.
pub fn from_multiplier(base: u64, multiplier: f64) -> Option<u64> {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return None;
    }

    let scaled = (gap(base) / multiplier).ceil();
    if scaled >= TWO_POW_64 {
        return Some(0);
    }
    if scaled <= 1.0 {
        return Some(u64::MAX);
    }

    // 1 < scaled < 2^64, so it is exact in u64 after the ceil above
    Some(0u64.wrapping_sub(scaled as u64))
}

/// How many times harder `difficulty` is than `base`
pub fn to_multiplier(base: u64, difficulty: u64) -> f64 {
    gap(base) / gap(difficulty)
}
