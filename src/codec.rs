//! Hex encodings used by the ledger for roots, thresholds and work
//!
//! Roots are 64 hex digits in byte order. Difficulties and work values are
//! 16 hex digits, most significant first (the integer, not its LE bytes).

use nanowork_core::ROOT_LEN;

use crate::error::WorkError;

/// Decode a 32-byte root from hex
pub fn parse_root(hex_root: &str) -> Result<[u8; ROOT_LEN], WorkError> {
    let bytes = hex::decode(hex_root.trim())
        .map_err(|e| WorkError::InvalidInput(format!("root is not valid hex: {e}")))?;
    root_from_slice(&bytes)
}

/// Check a raw root slice is exactly 32 bytes
pub fn root_from_slice(root: &[u8]) -> Result<[u8; ROOT_LEN], WorkError> {
    root.try_into().map_err(|_| {
        WorkError::InvalidInput(format!(
            "root must be {ROOT_LEN} bytes, got {}",
            root.len()
        ))
    })
}

fn parse_u64_hex(what: &str, text: &str) -> Result<u64, WorkError> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);

    if digits.is_empty() || digits.len() > 16 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(WorkError::InvalidInput(format!(
            "{what} must be 1 to 16 hex digits, got {text:?}"
        )));
    }

    u64::from_str_radix(digits, 16)
        .map_err(|e| WorkError::InvalidInput(format!("{what} is not valid hex: {e}")))
}

/// Decode a difficulty threshold
pub fn parse_difficulty(hex_difficulty: &str) -> Result<u64, WorkError> {
    parse_u64_hex("difficulty", hex_difficulty)
}

/// Decode a work value (nonce)
pub fn parse_work(hex_work: &str) -> Result<u64, WorkError> {
    parse_u64_hex("work", hex_work)
}

/// Encode a work value or threshold as 16 lowercase hex digits
pub fn work_to_hex(value: u64) -> String {
    format!("{value:016x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_length_is_enforced() {
        assert!(parse_root(&"00".repeat(32)).is_ok());
        assert!(matches!(
            parse_root(&"00".repeat(16)),
            Err(WorkError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_root(&"00".repeat(33)),
            Err(WorkError::InvalidInput(_))
        ));
        assert!(matches!(parse_root("zz"), Err(WorkError::InvalidInput(_))));
    }

    #[test]
    fn test_root_keeps_byte_order() {
        let root = parse_root(
            "E89208DD038FBB269987689621D52292AE9C35941A7484756ECCED92A65093BA",
        )
        .unwrap();
        assert_eq!(root[0], 0xE8);
        assert_eq!(root[31], 0xBA);
    }

    #[test]
    fn test_work_hex_round_trip() {
        assert_eq!(parse_work("62f05417dd3fb691").unwrap(), 0x62f0_5417_dd3f_b691);
        assert_eq!(work_to_hex(0x62f0_5417_dd3f_b691), "62f05417dd3fb691");
        assert_eq!(work_to_hex(1), "0000000000000001");
        assert_eq!(parse_difficulty("0xffffffc000000000").unwrap(), 0xffff_ffc0_0000_0000);
    }

    #[test]
    fn test_bad_thresholds_are_rejected() {
        assert!(parse_difficulty("").is_err());
        assert!(parse_difficulty("1ffffffc000000000").is_err());
        assert!(parse_work("not-hex").is_err());
    }

    #[test]
    fn test_signed_thresholds_are_rejected() {
        assert!(matches!(parse_difficulty("+fff"), Err(WorkError::InvalidInput(_))));
        assert!(matches!(parse_work("-1"), Err(WorkError::InvalidInput(_))));
        assert!(matches!(parse_difficulty("0x+fff"), Err(WorkError::InvalidInput(_))));
        assert_eq!(parse_difficulty("fff").unwrap(), 0xfff);
    }
}
