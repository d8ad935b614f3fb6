//! 160-bit currency codes

use serde_json::Value;
use std::fmt;

use crate::traits::SerializedType;
use crate::types::*;
use crate::utils::BinaryParser;

/// Encoded length of a currency code
pub const CURRENCY_CODE_LENGTH: usize = 20;

/// Code of the native currency, encoded as all zero bytes
pub const NATIVE_CURRENCY_CODE: &str = "XRP";

const ISO_CODE_START: usize = 12;
const ISO_CODE_END: usize = 15;
const ISO_SYMBOLS: &str = "?!@#$%^&*<>(){}[]|";

/// Currency code in its 20-byte canonical form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Currency {
    buffer: [u8; CURRENCY_CODE_LENGTH],
}

impl Currency {
    /// Build from raw bytes
    pub fn from_bytes(buffer: [u8; CURRENCY_CODE_LENGTH]) -> Self {
        Self { buffer }
    }

    /// Parse a display string: `"XRP"`, a three-character code, or 40 hex
    /// characters
    pub fn from_code(code: &str) -> CodecResult<Self> {
        if code == NATIVE_CURRENCY_CODE {
            return Ok(Self::from_bytes([0u8; CURRENCY_CODE_LENGTH]));
        }
        if is_iso_code(code) {
            let mut buffer = [0u8; CURRENCY_CODE_LENGTH];
            buffer[ISO_CODE_START..ISO_CODE_END].copy_from_slice(code.as_bytes());
            return Ok(Self::from_bytes(buffer));
        }
        if code.len() == CURRENCY_CODE_LENGTH * 2 {
            let mut buffer = [0u8; CURRENCY_CODE_LENGTH];
            hex::decode_to_slice(code, &mut buffer).map_err(|e| {
                CodecError::InvalidFormat(format!("invalid hex currency '{}': {}", code, e))
            })?;
            return Ok(Self::from_bytes(buffer));
        }
        Err(CodecError::InvalidFormat(format!(
            "unsupported currency representation: '{}'",
            code
        )))
    }

    /// Whether this is the native currency's all-zero code
    pub fn is_native(&self) -> bool {
        self.buffer.iter().all(|&b| b == 0)
    }

    /// Display string: the three-character code when the bytes use the
    /// standard layout, otherwise 40 uppercase hex characters
    pub fn to_code(&self) -> CodecResult<String> {
        if self.is_native() {
            return Ok(NATIVE_CURRENCY_CODE.to_string());
        }
        let padding_is_zero = self.buffer[..ISO_CODE_START].iter().all(|&b| b == 0)
            && self.buffer[ISO_CODE_END..].iter().all(|&b| b == 0);
        if padding_is_zero {
            let candidate = &self.buffer[ISO_CODE_START..ISO_CODE_END];
            if candidate == NATIVE_CURRENCY_CODE.as_bytes() {
                return Err(CodecError::InvalidFormat(
                    "disallowed currency code: the native code must be all zero bytes"
                        .to_string(),
                ));
            }
            if let Ok(code) = std::str::from_utf8(candidate) {
                if is_iso_code(code) {
                    return Ok(code.to_string());
                }
            }
        }
        Ok(hex::encode_upper(self.buffer))
    }
}

impl SerializedType for Currency {
    fn from_value(value: &Value) -> CodecResult<Self> {
        match value {
            Value::String(code) => Self::from_code(code),
            other => Err(CodecError::InvalidFormat(format!(
                "currency must be a string, got {}",
                other
            ))),
        }
    }

    fn from_parser(
        parser: &mut BinaryParser<'_>,
        _length_hint: Option<usize>,
    ) -> CodecResult<Self> {
        Ok(Self::from_bytes(parser.read_array::<CURRENCY_CODE_LENGTH>()?))
    }

    fn to_bytes(&self) -> &[u8] {
        &self.buffer
    }

    fn to_json(&self) -> CodecResult<Value> {
        self.to_code().map(Value::String)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_code() {
            Ok(code) => f.write_str(&code),
            Err(_) => f.write_str(&hex::encode_upper(self.buffer)),
        }
    }
}

fn is_iso_code(code: &str) -> bool {
    code.len() == 3
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ISO_SYMBOLS.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_code_layout() {
        let usd = Currency::from_code("USD").unwrap();
        assert_eq!(
            usd.to_hex(),
            "0000000000000000000000005553440000000000"
        );
        assert_eq!(usd.to_code().unwrap(), "USD");
    }

    #[test]
    fn test_native_code_is_zero() {
        let xrp = Currency::from_code("XRP").unwrap();
        assert!(xrp.is_native());
        assert_eq!(xrp.to_bytes(), &[0u8; 20]);
        assert_eq!(xrp.to_code().unwrap(), "XRP");
    }

    #[test]
    fn test_hex_code() {
        let code = "0158415500000000C1F76FF6ECB0BAC600000000";
        let currency = Currency::from_code(code).unwrap();
        assert_eq!(currency.to_code().unwrap(), code);

        // Hex spelling of a standard code renders as the code
        let usd = Currency::from_code("0000000000000000000000005553440000000000").unwrap();
        assert_eq!(usd.to_code().unwrap(), "USD");
    }

    #[test]
    fn test_native_code_in_standard_slot_rejected() {
        let fake = Currency::from_code("0000000000000000000000005852500000000000").unwrap();
        assert!(matches!(fake.to_code(), Err(CodecError::InvalidFormat(_))));
    }

    #[test]
    fn test_invalid_codes() {
        for code in ["", "US", "USDT", "U D", "zz00000000000000000000000000000000000000"] {
            assert!(
                matches!(Currency::from_code(code), Err(CodecError::InvalidFormat(_))),
                "{}",
                code
            );
        }
    }

    #[test]
    fn test_from_parser_reads_twenty_bytes() {
        let mut data = Currency::from_code("EUR").unwrap().to_bytes().to_vec();
        data.push(0xAA);
        let mut parser = BinaryParser::new(&data);
        let currency = Currency::from_parser(&mut parser, None).unwrap();
        assert_eq!(currency.to_code().unwrap(), "EUR");
        assert_eq!(parser.remaining(), 1);
    }
}
