//! Issued-currency value encoding: exact decimal ↔ 8-byte value field
//!
//! A nonzero issued value is normalized to a 16-digit mantissa and an
//! exponent in [-96, 80] before packing:
//!
//! ```text
//!  63   62   61 ........ 54   53 .................. 0
//! [1] [sign] [exponent + 97] [       mantissa        ]
//! ```
//!
//! Zero is the value field with only bit 63 set.

use bigdecimal::BigDecimal;
use std::fmt;
use std::str::FromStr;

use crate::amount::context::DecimalContext;
use crate::amount::native::{NOT_NATIVE_BIT, POSITIVE_BIT};
use crate::types::*;
use crate::utils::validation::{parse_decimal, ParsedDecimal};

/// Encoded length of an issued-currency amount: value, currency, issuer
pub const ISSUED_AMOUNT_BYTE_LENGTH: usize = 48;

/// Length of the value field that leads an issued-currency amount
pub const VALUE_FIELD_BYTE_LENGTH: usize = 8;

/// Value field of an issued-currency zero
pub const ZERO_VALUE_FIELD: u64 = NOT_NATIVE_BIT;

const EXPONENT_BIAS: i32 = 97;
const EXPONENT_SHIFT: u32 = 54;
const EXPONENT_MASK: u64 = 0xFF;
const MANTISSA_MASK: u64 = 0x003F_FFFF_FFFF_FFFF;

/// Canonical form of an issued-currency value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalValue {
    /// Exact zero, however it was spelled
    Zero,
    /// `(-1)^negative · mantissa · 10^exponent` with mantissa in the
    /// context's 16-digit window
    Normalized {
        negative: bool,
        mantissa: u64,
        exponent: i32,
    },
}

fn in_window(mantissa: u64, exponent: i32, context: &DecimalContext) -> bool {
    (context.min_mantissa()..=context.max_mantissa()).contains(&mantissa)
        && (context.min_exponent()..=context.max_exponent()).contains(&exponent)
}

impl CanonicalValue {
    /// Pack into the 64-bit value field.
    ///
    /// Fails with `OutOfRange` unless the mantissa and exponent lie in the
    /// protocol window; the mantissa then fits in bits 53..0.
    pub fn to_bits(&self) -> CodecResult<u64> {
        match *self {
            CanonicalValue::Zero => Ok(ZERO_VALUE_FIELD),
            CanonicalValue::Normalized {
                negative,
                mantissa,
                exponent,
            } => {
                if !in_window(mantissa, exponent, &DecimalContext::ISSUED) {
                    return Err(CodecError::OutOfRange(format!(
                        "mantissa {} exponent {} is not a canonical issued value",
                        mantissa, exponent
                    )));
                }
                let mut bits = NOT_NATIVE_BIT;
                if !negative {
                    bits |= POSITIVE_BIT;
                }
                bits |= ((exponent + EXPONENT_BIAS) as u64) << EXPONENT_SHIFT;
                Ok(bits | mantissa)
            }
        }
    }

    /// Unpack a 64-bit value field, rejecting anything outside `context`
    pub fn from_bits(bits: u64, context: &DecimalContext) -> CodecResult<Self> {
        if bits == ZERO_VALUE_FIELD {
            return Ok(CanonicalValue::Zero);
        }
        if bits & NOT_NATIVE_BIT == 0 {
            return Err(CodecError::InvalidFormat(format!(
                "value field {:016X} is not an issued-currency value",
                bits
            )));
        }

        let negative = bits & POSITIVE_BIT == 0;
        let exponent = ((bits >> EXPONENT_SHIFT) & EXPONENT_MASK) as i32 - EXPONENT_BIAS;
        let mantissa = bits & MANTISSA_MASK;

        if !in_window(mantissa, exponent, context) {
            tracing::warn!(
                value_field = %format!("{:016X}", bits),
                mantissa,
                exponent,
                "rejecting non-canonical issued value field"
            );
            return Err(CodecError::InvalidFormat(format!(
                "value field {:016X} is not canonical: mantissa {} exponent {}",
                bits, mantissa, exponent
            )));
        }

        Ok(CanonicalValue::Normalized {
            negative,
            mantissa,
            exponent,
        })
    }

    /// Whether this is the canonical zero
    pub fn is_zero(&self) -> bool {
        matches!(self, CanonicalValue::Zero)
    }

    /// Whether the value is zero or positive
    pub fn is_positive(&self) -> bool {
        match self {
            CanonicalValue::Zero => true,
            CanonicalValue::Normalized { negative, .. } => !negative,
        }
    }

    /// Exact decimal value
    pub fn to_decimal(&self) -> CodecResult<BigDecimal> {
        match *self {
            CanonicalValue::Zero => Ok(BigDecimal::from(0)),
            CanonicalValue::Normalized {
                negative,
                mantissa,
                exponent,
            } => {
                let sign = if negative { "-" } else { "" };
                let text = format!("{}{}e{}", sign, mantissa, exponent);
                BigDecimal::from_str(&text)
                    .map_err(|e| CodecError::InvalidFormat(format!("{}: {}", text, e)))
            }
        }
    }
}

/// Shortest exact positional decimal: no exponent, no trailing fractional
/// zeros, no trailing decimal point.
impl fmt::Display for CanonicalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (negative, mut mantissa, mut exponent) = match *self {
            CanonicalValue::Zero => return f.write_str("0"),
            CanonicalValue::Normalized {
                negative,
                mantissa,
                exponent,
            } => (negative, mantissa, exponent),
        };

        while mantissa != 0 && mantissa % 10 == 0 {
            mantissa /= 10;
            exponent += 1;
        }

        if negative {
            f.write_str("-")?;
        }
        let digits = mantissa.to_string();
        if exponent >= 0 {
            write!(f, "{}{}", digits, "0".repeat(exponent as usize))
        } else {
            let shift = exponent.unsigned_abs() as usize;
            if digits.len() > shift {
                let (int_part, frac_part) = digits.split_at(digits.len() - shift);
                write!(f, "{}.{}", int_part, frac_part)
            } else {
                write!(f, "0.{}{}", "0".repeat(shift - digits.len()), digits)
            }
        }
    }
}

/// Normalize an exact decimal into the canonical mantissa/exponent window.
///
/// Precision beyond the context's digits is truncated, not rounded. Values
/// too small to represent become [`CanonicalValue::Zero`]; values too large
/// fail with `Overflow`.
pub fn canonicalize(value: &BigDecimal, context: &DecimalContext) -> CodecResult<CanonicalValue> {
    let zero = BigDecimal::from(0);
    if *value == zero {
        return Ok(CanonicalValue::Zero);
    }
    let negative = *value < zero;

    let (digits, scale) = value.as_bigint_and_exponent();
    // The mantissa is carried as its decimal digits so inputs wider than
    // 64 bits truncate exactly. Nonzero digits never have a leading zero, so
    // `len < precision` is `mantissa < min_mantissa` and
    // `len > precision` is `mantissa > max_mantissa`.
    let mut mantissa = digits.to_string().trim_start_matches('-').to_string();
    let mut exponent = scale
        .checked_neg()
        .ok_or_else(|| CodecError::Overflow(format!("exponent of {} is unbounded", value)))?;

    let precision = context.precision() as usize;
    let min_exponent = i64::from(context.min_exponent());
    let max_exponent = i64::from(context.max_exponent());

    while mantissa.len() < precision && exponent > min_exponent {
        mantissa.push('0');
        exponent -= 1;
    }

    if mantissa.len() > precision {
        tracing::debug!(
            value = %value,
            digits = mantissa.len(),
            precision,
            "truncating issued value to canonical precision"
        );
    }
    while mantissa.len() > precision {
        if exponent >= max_exponent {
            return Err(CodecError::Overflow(format!(
                "amount overflow in issued currency value {}",
                value
            )));
        }
        mantissa.pop();
        exponent += 1;
    }

    if exponent < min_exponent || mantissa.len() < precision {
        tracing::debug!(value = %value, "issued value rounds to zero");
        return Ok(CanonicalValue::Zero);
    }

    if exponent > max_exponent || mantissa.len() > precision {
        return Err(CodecError::Overflow(format!(
            "amount overflow in issued currency value {}",
            value
        )));
    }

    let mantissa = mantissa
        .parse::<u64>()
        .map_err(|e| CodecError::Overflow(format!("mantissa of {}: {}", value, e)))?;

    Ok(CanonicalValue::Normalized {
        negative,
        mantissa,
        // Bounded by the context's exponent range
        exponent: exponent as i32,
    })
}

/// Encode the text of an issued value as its 8-byte value field
pub fn encode_issued_value(
    value: &str,
    context: &DecimalContext,
) -> CodecResult<[u8; VALUE_FIELD_BYTE_LENGTH]> {
    let canonical = match parse_decimal(value)? {
        ParsedDecimal::Exact(decimal) => canonicalize(&decimal, context)?,
        ParsedDecimal::Unbounded => {
            return Err(CodecError::Overflow(format!(
                "amount overflow in issued currency value {}",
                value
            )));
        }
        ParsedDecimal::Vanishing => {
            tracing::debug!(value, "issued value rounds to zero");
            CanonicalValue::Zero
        }
    };
    Ok(canonical.to_bits()?.to_be_bytes())
}

/// Decode an 8-byte value field
pub fn decode_issued_value(
    bytes: &[u8; VALUE_FIELD_BYTE_LENGTH],
    context: &DecimalContext,
) -> CodecResult<CanonicalValue> {
    CanonicalValue::from_bits(u64::from_be_bytes(*bytes), context)
}
