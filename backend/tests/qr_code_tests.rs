//! QR identifier tests
//!
//! Tests for the batch QR code generator including:
//! - Identifier shape and character set
//! - Uniqueness across repeated generation

use std::collections::HashSet;

use shared::models::generate_qr_code;

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Codes follow PHARM-<millis>-<9 chars>
    #[test]
    fn test_qr_code_shape() {
        let code = generate_qr_code();
        let parts: Vec<&str> = code.splitn(3, '-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "PHARM");
        assert!(parts[1].parse::<i64>().is_ok(), "timestamp segment: {}", code);
        assert_eq!(parts[2].len(), 9);
    }

    /// The entropy segment is uppercase alphanumeric
    #[test]
    fn test_qr_code_suffix_charset() {
        for _ in 0..50 {
            let code = generate_qr_code();
            let suffix = code.rsplit('-').next().unwrap();
            assert!(suffix
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    /// The timestamp segment is non-decreasing across calls
    #[test]
    fn test_qr_code_timestamp_monotonic() {
        let parse_millis = |code: &str| -> i64 {
            code.splitn(3, '-').nth(1).unwrap().parse().unwrap()
        };

        let first = parse_millis(&generate_qr_code());
        let second = parse_millis(&generate_qr_code());
        assert!(second >= first);
    }

    /// Rapid generation never collides; the random suffix disambiguates
    /// same-millisecond codes
    #[test]
    fn test_qr_code_uniqueness() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(generate_qr_code()));
        }
    }
}
