//! Traits shared by every ledger field codec

use serde_json::Value;

use crate::types::*;
use crate::utils::BinaryParser;

/// Capability contract for a ledger field type
///
/// A higher-level transaction serializer can treat every field type the same
/// way through this trait: build it from a JSON value or from a byte cursor,
/// then render it back to canonical bytes or to JSON.
pub trait SerializedType: Sized {
    /// Construct from a JSON domain value
    fn from_value(value: &Value) -> CodecResult<Self>;

    /// Construct by consuming bytes from a cursor
    ///
    /// `length_hint` is only meaningful for variable-length fields; fields
    /// whose framing is self-describing ignore it.
    fn from_parser(parser: &mut BinaryParser<'_>, length_hint: Option<usize>)
        -> CodecResult<Self>;

    /// Canonical byte encoding
    fn to_bytes(&self) -> &[u8];

    /// JSON display form
    fn to_json(&self) -> CodecResult<Value>;

    /// Canonical encoding as uppercase hex
    fn to_hex(&self) -> String {
        hex::encode_upper(self.to_bytes())
    }

    /// Parse exactly one value from a hex string
    ///
    /// Fails with `InvalidFormat` on bad hex or if bytes remain after the
    /// value has been read.
    fn from_hex(hex_str: &str) -> CodecResult<Self> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| CodecError::InvalidFormat(format!("invalid hex '{}': {}", hex_str, e)))?;
        let mut parser = BinaryParser::new(&bytes);
        let value = Self::from_parser(&mut parser, None)?;
        if !parser.is_end() {
            return Err(CodecError::InvalidFormat(format!(
                "{} trailing bytes after field",
                parser.remaining()
            )));
        }
        Ok(value)
    }
}
