//! Native amount encoding: drops ↔ 8-byte value field

use bigdecimal::BigDecimal;

use crate::types::*;
use crate::utils::validation::verify_native_value;

/// Encoded length of a native amount
pub const NATIVE_AMOUNT_BYTE_LENGTH: usize = 8;

/// Bit 63: set for issued currency, clear for native amounts
pub const NOT_NATIVE_BIT: u64 = 0x8000_0000_0000_0000;
/// Bit 62: set when the amount is non-negative
pub const POSITIVE_BIT: u64 = 0x4000_0000_0000_0000;

const NATIVE_VALUE_MASK: u64 = 0x3FFF_FFFF_FFFF_FFFF;

/// Encode a drops string as an 8-byte value field
///
/// The "is positive" bit is always set. It reads backwards from two's
/// complement but is the protocol's sign convention.
pub fn encode_native(drops: &str) -> CodecResult<[u8; NATIVE_AMOUNT_BYTE_LENGTH]> {
    let decimal = verify_native_value(drops)?;
    let value = drops_to_u64(drops, &decimal)?;
    Ok((value | POSITIVE_BIT).to_be_bytes())
}

/// Render an 8-byte native value field as an unsigned drops string
pub fn decode_native(bytes: &[u8; NATIVE_AMOUNT_BYTE_LENGTH]) -> String {
    (u64::from_be_bytes(*bytes) & NATIVE_VALUE_MASK).to_string()
}

/// Whether bit 62 is set in the first byte
pub fn is_positive(bytes: &[u8]) -> bool {
    bytes.first().is_some_and(|b| b & 0x40 != 0)
}

fn drops_to_u64(drops: &str, decimal: &BigDecimal) -> CodecResult<u64> {
    let integral = decimal.with_scale(0);
    if integral != *decimal {
        return Err(CodecError::InvalidFormat(format!(
            "{} is not a whole number of drops",
            drops
        )));
    }
    let (digits, _) = integral.as_bigint_and_exponent();
    digits
        .to_string()
        .parse::<u64>()
        .map_err(|e| CodecError::OutOfRange(format!("{} does not fit in 64 bits: {}", drops, e)))
}
