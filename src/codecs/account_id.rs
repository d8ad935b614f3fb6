//! 160-bit account identifiers

use serde_json::Value;
use std::fmt;

use crate::traits::SerializedType;
use crate::types::*;
use crate::utils::{base58, BinaryParser};

/// Encoded length of an account identifier
pub const ACCOUNT_ID_LENGTH: usize = 20;

const CLASSIC_ADDRESS_VERSION: u8 = 0x00;

/// Account identifier in its 20-byte canonical form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId {
    buffer: [u8; ACCOUNT_ID_LENGTH],
}

impl AccountId {
    pub fn from_bytes(buffer: [u8; ACCOUNT_ID_LENGTH]) -> Self {
        Self { buffer }
    }

    /// Parse a classic address or 40 hex characters
    pub fn from_address(address: &str) -> CodecResult<Self> {
        let mut buffer = [0u8; ACCOUNT_ID_LENGTH];
        if address.len() == ACCOUNT_ID_LENGTH * 2
            && hex::decode_to_slice(address, &mut buffer).is_ok()
        {
            return Ok(Self::from_bytes(buffer));
        }

        let payload = base58::decode_check(CLASSIC_ADDRESS_VERSION, address)
            .map_err(|e| CodecError::InvalidFormat(format!("invalid account address: {}", e)))?;
        if payload.len() != ACCOUNT_ID_LENGTH {
            return Err(CodecError::InvalidFormat(format!(
                "'{}' decodes to {} bytes, expected {}",
                address,
                payload.len(),
                ACCOUNT_ID_LENGTH
            )));
        }
        buffer.copy_from_slice(&payload);
        Ok(Self::from_bytes(buffer))
    }

    /// Classic address, e.g. `rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh`
    pub fn to_address(&self) -> String {
        base58::encode_check(CLASSIC_ADDRESS_VERSION, &self.buffer)
    }
}

impl SerializedType for AccountId {
    fn from_value(value: &Value) -> CodecResult<Self> {
        match value {
            Value::String(address) => Self::from_address(address),
            other => Err(CodecError::InvalidFormat(format!(
                "account must be a string, got {}",
                other
            ))),
        }
    }

    fn from_parser(
        parser: &mut BinaryParser<'_>,
        _length_hint: Option<usize>,
    ) -> CodecResult<Self> {
        Ok(Self::from_bytes(parser.read_array::<ACCOUNT_ID_LENGTH>()?))
    }

    fn to_bytes(&self) -> &[u8] {
        &self.buffer
    }

    fn to_json(&self) -> CodecResult<Value> {
        Ok(Value::String(self.to_address()))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_address())
    }
}
