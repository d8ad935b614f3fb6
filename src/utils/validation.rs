//! Validation utilities

use bigdecimal::BigDecimal;
use std::str::FromStr;

use crate::types::*;

/// Largest native amount, in drops
pub const MAX_DROPS: u64 = 100_000_000_000_000_000;

/// Reciprocal of the smallest nonzero native amount (1e-6)
const MIN_NATIVE_RECIPROCAL: u64 = 1_000_000;

/// Returns true if the string contains a decimal point character.
///
/// | input   | result |
/// |---------|--------|
/// | `"100"` | false  |
/// | `"1.5"` | true   |
/// | `"1e3"` | false  |
pub fn contains_decimal_point(value: &str) -> bool {
    value.contains('.')
}

/// Outcome of parsing a decimal literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedDecimal {
    /// The exact value
    Exact(BigDecimal),
    /// Nonzero, with an exponent too large to hold in 64 bits
    Unbounded,
    /// Nonzero, with an exponent too negative to hold in 64 bits
    Vanishing,
}

/// Digits in the smallest exponent magnitude that can overflow an `i64` scale
const MIN_OVERFLOW_EXPONENT_DIGITS: usize = 19;

/// Shape of a literal of the form `[+-][digits][.digits](e|E)[+-]digits`
struct ExponentLiteral {
    nonzero: bool,
    negative_exponent: bool,
}

fn scan_exponent_literal(value: &str) -> Option<ExponentLiteral> {
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

    let body = value.strip_prefix(['+', '-']).unwrap_or(value);
    let (mantissa, exponent) = body.split_once(['e', 'E'])?;
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }
    let exponent_digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
    if exponent_digits.is_empty() || !all_digits(exponent_digits) {
        return None;
    }
    // Only exponents of 64-bit magnitude can overflow the scale
    if exponent_digits.trim_start_matches('0').len() < MIN_OVERFLOW_EXPONENT_DIGITS {
        return None;
    }

    Some(ExponentLiteral {
        nonzero: mantissa.bytes().any(|b| matches!(b, b'1'..=b'9')),
        negative_exponent: exponent.starts_with('-'),
    })
}

/// Parse a string as an exact decimal.
///
/// A well-formed literal whose exponent does not fit in 64 bits is not a
/// format error: it parses to [`ParsedDecimal::Unbounded`] or
/// [`ParsedDecimal::Vanishing`] so each amount kind can report it as a range
/// failure. Zero digits with such an exponent are still zero.
pub fn parse_decimal(value: &str) -> CodecResult<ParsedDecimal> {
    let error = match BigDecimal::from_str(value) {
        Ok(decimal) => return Ok(ParsedDecimal::Exact(decimal)),
        Err(e) => e,
    };
    match scan_exponent_literal(value) {
        Some(literal) if !literal.nonzero => Ok(ParsedDecimal::Exact(BigDecimal::from(0))),
        Some(literal) if literal.negative_exponent => Ok(ParsedDecimal::Vanishing),
        Some(_) => Ok(ParsedDecimal::Unbounded),
        None => Err(CodecError::InvalidFormat(format!(
            "'{}' is not a decimal number: {}",
            value, error
        ))),
    }
}

/// Validate the text of a native amount.
///
/// Native amounts never contain a decimal point. Zero is always valid;
/// anything else must lie in `[1e-6, 1e17]`.
pub fn verify_native_value(value: &str) -> CodecResult<BigDecimal> {
    if contains_decimal_point(value) {
        return Err(CodecError::InvalidFormat(format!(
            "{} is an invalid native amount: decimal point not allowed",
            value
        )));
    }

    let out_of_range = || CodecError::OutOfRange(format!("{} is an invalid native amount", value));
    let decimal = match parse_decimal(value)? {
        ParsedDecimal::Exact(decimal) => decimal,
        ParsedDecimal::Unbounded | ParsedDecimal::Vanishing => return Err(out_of_range()),
    };
    // Zero is below the minimum but always valid
    if decimal == BigDecimal::from(0) {
        return Ok(decimal);
    }

    let too_small = &decimal * &BigDecimal::from(MIN_NATIVE_RECIPROCAL) < BigDecimal::from(1);
    if too_small || decimal > BigDecimal::from(MAX_DROPS) {
        return Err(out_of_range());
    }

    Ok(decimal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_decimal_point_truth_table() {
        assert!(!contains_decimal_point("100"));
        assert!(!contains_decimal_point("1e3"));
        assert!(!contains_decimal_point(""));
        assert!(contains_decimal_point("1.5"));
        assert!(contains_decimal_point("0.0"));
        assert!(contains_decimal_point("."));
    }

    #[test]
    fn test_native_rejects_decimal_point() {
        for value in ["1.5", "0.0", "100.", ".1"] {
            assert!(matches!(
                verify_native_value(value),
                Err(CodecError::InvalidFormat(_))
            ));
        }
    }

    #[test]
    fn test_native_zero_always_valid() {
        assert!(verify_native_value("0").is_ok());
        assert!(verify_native_value("-0").is_ok());
        assert!(verify_native_value("0e10").is_ok());
    }

    #[test]
    fn test_native_range() {
        assert!(verify_native_value("1").is_ok());
        assert!(verify_native_value("100000000000000000").is_ok());
        assert!(verify_native_value("1e-6").is_ok());

        for value in ["-1", "100000000000000001", "1e18", "1e-7"] {
            assert!(matches!(
                verify_native_value(value),
                Err(CodecError::OutOfRange(_))
            ));
        }
    }

    #[test]
    fn test_native_exponent_beyond_64_bits_is_out_of_range() {
        let values = [
            "1e9999999999999999999",
            "1e-9999999999999999999",
            "-5E+99999999999999999999",
        ];
        for value in values {
            assert!(
                matches!(verify_native_value(value), Err(CodecError::OutOfRange(_))),
                "{}",
                value
            );
        }
        assert!(verify_native_value("0e9999999999999999999").is_ok());
    }

    #[test]
    fn test_parse_decimal_classifies_huge_exponents() {
        assert_eq!(
            parse_decimal("25e-3").unwrap(),
            ParsedDecimal::Exact(BigDecimal::from_str("0.025").unwrap())
        );
        assert_eq!(
            parse_decimal("1.5e9999999999999999999").unwrap(),
            ParsedDecimal::Unbounded
        );
        assert_eq!(
            parse_decimal("-1e-9999999999999999999").unwrap(),
            ParsedDecimal::Vanishing
        );
        assert_eq!(
            parse_decimal("-0.00E99999999999999999999").unwrap(),
            ParsedDecimal::Exact(BigDecimal::from(0))
        );
    }

    #[test]
    fn test_parse_decimal_rejects_malformed_exponents() {
        let values = ["1e", "1e+", "1.2.3e99999999999999999999", "1e99999999999999999999x"];
        for value in values {
            assert!(
                matches!(parse_decimal(value), Err(CodecError::InvalidFormat(_))),
                "{}",
                value
            );
        }
    }

    #[test]
    fn test_native_rejects_garbage() {
        for value in ["", "abc", "1x", "NaN"] {
            assert!(matches!(
                verify_native_value(value),
                Err(CodecError::InvalidFormat(_))
            ));
        }
    }
}
