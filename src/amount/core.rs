//! Amount field type dispatching between the native and issued encodings

use serde_json::Value;

use crate::amount::context::DecimalContext;
use crate::amount::issued::{
    decode_issued_value, encode_issued_value, CanonicalValue, ISSUED_AMOUNT_BYTE_LENGTH,
    VALUE_FIELD_BYTE_LENGTH,
};
use crate::amount::native::{self, decode_native, encode_native, NATIVE_AMOUNT_BYTE_LENGTH};
use crate::codecs::{AccountId, Currency};
use crate::traits::SerializedType;
use crate::types::*;
use crate::utils::BinaryParser;

/// High bit of the first byte: clear for native, set for issued currency
const NOT_NATIVE_BYTE_MASK: u8 = 0x80;

/// An amount field in canonical byte form
///
/// The buffer is always 8 bytes with the high bit clear or 48 bytes with it
/// set; every constructor enforces that framing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Amount {
    buffer: Vec<u8>,
}

impl Amount {
    /// Encode a domain value with an explicit decimal context
    pub fn from_value_with_context(value: &Value, context: &DecimalContext) -> CodecResult<Self> {
        let amount = AmountValue::try_from(value)?;
        Self::from_amount_value_with_context(&amount, context)
    }

    /// Encode a typed domain value
    pub fn from_amount_value(value: &AmountValue) -> CodecResult<Self> {
        Self::from_amount_value_with_context(value, &DecimalContext::default())
    }

    pub fn from_amount_value_with_context(
        value: &AmountValue,
        context: &DecimalContext,
    ) -> CodecResult<Self> {
        match value {
            AmountValue::Native(drops) => Ok(Self {
                buffer: encode_native(drops)?.to_vec(),
            }),
            AmountValue::Issued(issued) => {
                let value_bytes = encode_issued_value(&issued.value, context)?;
                let currency = Currency::from_code(&issued.currency)?;
                let issuer = AccountId::from_address(&issued.issuer)?;

                let mut buffer = Vec::with_capacity(ISSUED_AMOUNT_BYTE_LENGTH);
                buffer.extend_from_slice(&value_bytes);
                buffer.extend_from_slice(currency.to_bytes());
                buffer.extend_from_slice(issuer.to_bytes());
                Ok(Self { buffer })
            }
        }
    }

    /// Whether this is a native amount (high bit of the first byte clear)
    pub fn is_native(&self) -> bool {
        self.buffer[0] & NOT_NATIVE_BYTE_MASK == 0
    }

    /// Whether the "is positive" bit is set
    pub fn is_positive(&self) -> bool {
        native::is_positive(&self.buffer)
    }

    /// Decode into the typed domain value
    pub fn to_value(&self) -> CodecResult<AmountValue> {
        self.to_value_with_context(&DecimalContext::default())
    }

    /// Decode, re-validating issued values against `context`
    pub fn to_value_with_context(&self, context: &DecimalContext) -> CodecResult<AmountValue> {
        let mut parser = BinaryParser::new(&self.buffer);
        if self.is_native() {
            let bytes = parser.read_array::<NATIVE_AMOUNT_BYTE_LENGTH>()?;
            return Ok(AmountValue::Native(decode_native(&bytes)));
        }

        let value_bytes = parser.read_array::<VALUE_FIELD_BYTE_LENGTH>()?;
        let value = decode_issued_value(&value_bytes, context)?;
        let currency = Currency::from_parser(&mut parser, None)?;
        let issuer = AccountId::from_parser(&mut parser, None)?;

        Ok(AmountValue::Issued(IssuedAmount {
            value: value.to_string(),
            currency: currency.to_code()?,
            issuer: issuer.to_address(),
        }))
    }

    /// Decoded value field of an issued-currency amount; `None` for native
    pub fn issued_value(&self) -> CodecResult<Option<CanonicalValue>> {
        if self.is_native() {
            return Ok(None);
        }
        let mut parser = BinaryParser::new(&self.buffer);
        let value_bytes = parser.read_array::<VALUE_FIELD_BYTE_LENGTH>()?;
        decode_issued_value(&value_bytes, &DecimalContext::default()).map(Some)
    }

    /// Encoded length implied by the first byte of a field
    fn encoded_length(first_byte: u8) -> usize {
        if first_byte & NOT_NATIVE_BYTE_MASK != 0 {
            ISSUED_AMOUNT_BYTE_LENGTH
        } else {
            NATIVE_AMOUNT_BYTE_LENGTH
        }
    }
}

impl SerializedType for Amount {
    fn from_value(value: &Value) -> CodecResult<Self> {
        Self::from_value_with_context(value, &DecimalContext::default())
    }

    /// Consume exactly one amount field; the length hint is ignored because
    /// the leading bit frames the field
    fn from_parser(
        parser: &mut BinaryParser<'_>,
        _length_hint: Option<usize>,
    ) -> CodecResult<Self> {
        let first_byte = parser.peek()?;
        let length = Self::encoded_length(first_byte);
        let not_native = length == ISSUED_AMOUNT_BYTE_LENGTH;
        tracing::trace!(
            not_native,
            length,
            position = parser.position(),
            "reading amount field"
        );
        Ok(Self {
            buffer: parser.read(length)?.to_vec(),
        })
    }

    fn to_bytes(&self) -> &[u8] {
        &self.buffer
    }

    fn to_json(&self) -> CodecResult<Value> {
        self.to_value().map(|value| value.to_json())
    }
}

impl TryFrom<&[u8]> for Amount {
    type Error = CodecError;

    /// Parse a buffer holding exactly one amount field
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let mut parser = BinaryParser::new(bytes);
        let amount = Self::from_parser(&mut parser, None)?;
        if !parser.is_end() {
            return Err(CodecError::InvalidFormat(format!(
                "{} trailing bytes after amount field",
                parser.remaining()
            )));
        }
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const GENESIS: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";

    #[test]
    fn test_native_amount() {
        let amount = Amount::from_value(&json!("100")).unwrap();
        assert!(amount.is_native());
        assert!(amount.is_positive());
        assert_eq!(amount.to_hex(), "4000000000000064");
        assert_eq!(amount.to_json().unwrap(), json!("100"));
        assert_eq!(amount.issued_value().unwrap(), None);
    }

    #[test]
    fn test_issued_amount_vector() {
        let amount = Amount::from_value(&json!({
            "value": "1",
            "currency": "USD",
            "issuer": GENESIS,
        }))
        .unwrap();

        assert!(!amount.is_native());
        assert!(amount.is_positive());
        assert_eq!(amount.to_bytes().len(), 48);
        assert_eq!(
            amount.to_hex(),
            concat!(
                "D4838D7EA4C68000",
                "0000000000000000000000005553440000000000",
                "B5F762798A53D543A014CAF8B297CFF8F2F937E8"
            )
        );
        assert_eq!(
            amount.to_json().unwrap(),
            json!({"value": "1", "currency": "USD", "issuer": GENESIS})
        );
    }

    #[test]
    fn test_negative_issued_amount() {
        let amount =
            Amount::from_amount_value(&AmountValue::issued("-12.5", "EUR", GENESIS)).unwrap();
        assert!(!amount.is_positive());
        assert_eq!(
            amount.to_value().unwrap(),
            AmountValue::issued("-12.5", "EUR", GENESIS)
        );
    }

    #[test]
    fn test_issued_zero_keeps_not_native_bit() {
        let amount = Amount::from_value(&json!({
            "value": "-0",
            "currency": "USD",
            "issuer": GENESIS,
        }))
        .unwrap();
        assert!(!amount.is_native());
        assert_eq!(&amount.to_bytes()[..8], &[0x80, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(amount.issued_value().unwrap(), Some(CanonicalValue::Zero));
        assert_eq!(amount.to_value().unwrap(), AmountValue::issued("0", "USD", GENESIS));
    }

    #[test]
    fn test_invalid_shapes() {
        assert!(matches!(
            Amount::from_value(&json!(100)),
            Err(CodecError::InvalidInput(_))
        ));
        assert!(matches!(
            Amount::from_value(&json!({"value": "1", "currency": "USD"})),
            Err(CodecError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bad_collaborator_values() {
        let bad_currency = json!({"value": "1", "currency": "DOLLAR", "issuer": GENESIS});
        let bad_issuer = json!({"value": "1", "currency": "USD", "issuer": "rNotAnAddress"});
        for value in [bad_currency, bad_issuer] {
            assert!(matches!(
                Amount::from_value(&value),
                Err(CodecError::InvalidFormat(_))
            ));
        }
    }

    #[test]
    fn test_from_parser_leaves_trailing_data() {
        let mut data = Amount::from_value(&json!("1")).unwrap().to_bytes().to_vec();
        data.extend_from_slice(&[0xFF; 60]);

        let mut parser = BinaryParser::new(&data);
        let amount = Amount::from_parser(&mut parser, Some(1000)).unwrap();
        assert_eq!(amount.to_bytes().len(), 8);
        assert_eq!(parser.position(), 8);
        assert_eq!(parser.remaining(), 60);

        // The trailing 0xFF bytes frame an issued field
        let next = Amount::from_parser(&mut parser, None).unwrap();
        assert!(!next.is_native());
        assert_eq!(parser.remaining(), 12);
    }

    #[test]
    fn test_from_parser_underrun() {
        let data = [0x80u8; 20];
        let mut parser = BinaryParser::new(&data);
        assert_eq!(
            Amount::from_parser(&mut parser, None),
            Err(CodecError::BufferUnderrun {
                requested: 48,
                remaining: 20
            })
        );
    }

    #[test]
    fn test_try_from_bytes_rejects_trailing() {
        let bytes = Amount::from_value(&json!("5")).unwrap().to_bytes().to_vec();
        assert!(Amount::try_from(bytes.as_slice()).is_ok());

        let mut longer = bytes.clone();
        longer.push(0);
        assert!(matches!(
            Amount::try_from(longer.as_slice()),
            Err(CodecError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_to_value_with_narrow_context() {
        let amount =
            Amount::from_amount_value(&AmountValue::issued("1e70", "USD", GENESIS)).unwrap();
        let narrow = DecimalContext::new(16, -96, 10).unwrap();
        assert!(matches!(
            amount.to_value_with_context(&narrow),
            Err(CodecError::InvalidFormat(_))
        ));
        assert!(amount.to_value().is_ok());
    }
}
