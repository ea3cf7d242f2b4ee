//! Base-62 short code allocation
//!
//! Codes are derived from the store-assigned record id, so uniqueness falls
//! out of the identity column: no counter, no randomness, no retry loop.

/// Digits first, then lowercase, then uppercase. Index == symbol value.
pub const BASE62_ALPHABET: &[u8; 62] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Longest custom alias we accept.
pub const MAX_ALIAS_LEN: usize = 32;

/// Encode a record id as a base-62 string, most-significant symbol first.
///
/// `0` encodes to `"0"`, not the empty string.
pub fn encode_id(id: u64) -> String {
    if id == 0 {
        return (BASE62_ALPHABET[0] as char).to_string();
    }

    let mut buf = Vec::new();
    let mut num = id;

    while num > 0 {
        let remainder = (num % 62) as usize;
        buf.push(BASE62_ALPHABET[remainder]);
        num /= 62;
    }

    // Remainder accumulation yields least-significant first
    buf.reverse();
    String::from_utf8(buf).expect("base62 output is always ASCII")
}

/// Check whether a user-supplied alias is acceptable as a short code:
/// non-empty, bounded length, base-62 alphabet only.
pub fn is_valid_alias(alias: &str) -> bool {
    !alias.is_empty()
        && alias.len() <= MAX_ALIAS_LEN
        && alias.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_encodes_to_zero_symbol() {
        assert_eq!(encode_id(0), "0");
    }

    #[test]
    fn test_alphabet_order() {
        assert_eq!(encode_id(9), "9");
        assert_eq!(encode_id(10), "a");
        assert_eq!(encode_id(35), "z");
        assert_eq!(encode_id(36), "A");
        assert_eq!(encode_id(61), "Z");
    }

    #[test]
    fn test_carry_into_second_symbol() {
        assert_eq!(encode_id(62), "10");
        assert_eq!(encode_id(62 * 62), "100");
        assert_eq!(encode_id(62 * 62 - 1), "ZZ");
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(encode_id(123_456), encode_id(123_456));
    }

    #[test]
    fn test_injective_over_range() {
        let mut seen = std::collections::HashSet::new();
        for id in 0..10_000u64 {
            assert!(seen.insert(encode_id(id)), "collision at id {}", id);
        }
    }

    #[test]
    fn test_large_id() {
        // 62^3 = 238328
        assert_eq!(encode_id(238_328), "1000");
        assert!(!encode_id(u64::MAX).is_empty());
    }

    #[test]
    fn test_valid_aliases() {
        assert!(is_valid_alias("promo"));
        assert!(is_valid_alias("Promo2024"));
        assert!(is_valid_alias("0"));
    }

    #[test]
    fn test_invalid_aliases() {
        assert!(!is_valid_alias(""));
        assert!(!is_valid_alias("has space"));
        assert!(!is_valid_alias("under_score"));
        assert!(!is_valid_alias("dash-ed"));
        assert!(!is_valid_alias("naïve"));
        assert!(!is_valid_alias(&"x".repeat(MAX_ALIAS_LEN + 1)));
    }
}
