//! Decimal context for issued-currency canonicalization

use serde::{Deserialize, Serialize};

use crate::types::*;

/// Significant digits of a canonical issued-currency mantissa
pub const MAX_PRECISION: u32 = 16;
/// Smallest exponent a canonical issued value may carry
pub const MIN_EXPONENT: i32 = -96;
/// Largest exponent a canonical issued value may carry
pub const MAX_EXPONENT: i32 = 80;

/// Precision and exponent bounds used when normalizing issued values
///
/// The context is an immutable `Copy` value passed into every
/// canonicalization and decode call. [`DecimalContext::ISSUED`] is the
/// protocol context. [`DecimalContext::new`] can narrow the exponent bounds
/// but never widen them, and the precision is fixed at 16 digits: the packed
/// mantissa must lie in `[10^15, 10^16 - 1]` for the field to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ContextFields", into = "ContextFields")]
pub struct DecimalContext {
    precision: u32,
    min_exponent: i32,
    max_exponent: i32,
}

impl DecimalContext {
    /// Canonical issued-currency context: 16 digits, exponent in [-96, 80]
    pub const ISSUED: Self = Self {
        precision: MAX_PRECISION,
        min_exponent: MIN_EXPONENT,
        max_exponent: MAX_EXPONENT,
    };

    /// Create a context, rejecting bounds the wire layout cannot represent
    pub fn new(precision: u32, min_exponent: i32, max_exponent: i32) -> CodecResult<Self> {
        if precision != MAX_PRECISION {
            return Err(CodecError::OutOfRange(format!(
                "precision {} is not the canonical {} digits",
                precision, MAX_PRECISION
            )));
        }
        if min_exponent < MIN_EXPONENT || max_exponent > MAX_EXPONENT {
            return Err(CodecError::OutOfRange(format!(
                "exponent bounds [{}, {}] exceed [{}, {}]",
                min_exponent, max_exponent, MIN_EXPONENT, MAX_EXPONENT
            )));
        }
        if min_exponent > max_exponent {
            return Err(CodecError::OutOfRange(format!(
                "minimum exponent {} is above maximum exponent {}",
                min_exponent, max_exponent
            )));
        }
        Ok(Self {
            precision,
            min_exponent,
            max_exponent,
        })
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn min_exponent(&self) -> i32 {
        self.min_exponent
    }

    pub fn max_exponent(&self) -> i32 {
        self.max_exponent
    }

    /// Smallest canonical mantissa, `10^(precision - 1)`
    pub fn min_mantissa(&self) -> u64 {
        10u64.pow(self.precision - 1)
    }

    /// Largest canonical mantissa, `10^precision - 1`
    pub fn max_mantissa(&self) -> u64 {
        10u64.pow(self.precision) - 1
    }
}

impl Default for DecimalContext {
    fn default() -> Self {
        Self::ISSUED
    }
}

#[derive(Serialize, Deserialize)]
struct ContextFields {
    precision: u32,
    min_exponent: i32,
    max_exponent: i32,
}

impl TryFrom<ContextFields> for DecimalContext {
    type Error = CodecError;

    fn try_from(fields: ContextFields) -> Result<Self, Self::Error> {
        Self::new(fields.precision, fields.min_exponent, fields.max_exponent)
    }
}

impl From<DecimalContext> for ContextFields {
    fn from(context: DecimalContext) -> Self {
        Self {
            precision: context.precision,
            min_exponent: context.min_exponent,
            max_exponent: context.max_exponent,
        }
    }
}
