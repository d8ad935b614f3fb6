//! Core types and data structures for the amount codec

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decoded, human-facing form of an amount field
///
/// Serializes to exactly the JSON shape the codec accepts: a bare string for
/// native amounts, an object with `value`, `currency` and `issuer` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountValue {
    /// Integer number of drops, as a digit string
    Native(String),
    /// Issued-currency value with its currency code and issuing account
    Issued(IssuedAmount),
}

impl AmountValue {
    /// Create a native amount
    pub fn native(drops: impl Into<String>) -> Self {
        AmountValue::Native(drops.into())
    }

    /// Create an issued-currency amount
    pub fn issued(
        value: impl Into<String>,
        currency: impl Into<String>,
        issuer: impl Into<String>,
    ) -> Self {
        AmountValue::Issued(IssuedAmount {
            value: value.into(),
            currency: currency.into(),
            issuer: issuer.into(),
        })
    }

    /// Returns true for the native variant
    pub fn is_native(&self) -> bool {
        matches!(self, AmountValue::Native(_))
    }

    /// Render as a JSON value
    pub fn to_json(&self) -> Value {
        match self {
            AmountValue::Native(drops) => Value::String(drops.clone()),
            AmountValue::Issued(issued) => {
                let mut map = serde_json::Map::new();
                map.insert("value".to_string(), Value::String(issued.value.clone()));
                map.insert(
                    "currency".to_string(),
                    Value::String(issued.currency.clone()),
                );
                map.insert("issuer".to_string(), Value::String(issued.issuer.clone()));
                Value::Object(map)
            }
        }
    }
}

impl TryFrom<&Value> for AmountValue {
    type Error = CodecError;

    /// Classify a JSON value as one of the two amount shapes.
    ///
    /// A string is native, an object with exactly `value`, `currency` and
    /// `issuer` is issued currency. Anything else is `InvalidInput`.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(drops) => Ok(AmountValue::Native(drops.clone())),
            Value::Object(map) if is_issued_amount_shape(map) => {
                Ok(AmountValue::Issued(IssuedAmount {
                    value: string_field(map, "value")?,
                    currency: string_field(map, "currency")?,
                    issuer: string_field(map, "issuer")?,
                }))
            }
            other => Err(CodecError::InvalidInput(format!(
                "cannot construct an amount from {}",
                other
            ))),
        }
    }
}

/// Issued-currency amount in display form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssuedAmount {
    /// Exact decimal value, e.g. `"1.25"` or `"-3e-20"`
    pub value: String,
    /// Currency code: a three-character code, `"XRP"`, or 40 hex characters
    pub currency: String,
    /// Issuing account as a classic address or 40 hex characters
    pub issuer: String,
}

const ISSUED_AMOUNT_KEYS: [&str; 3] = ["currency", "issuer", "value"];

fn is_issued_amount_shape(map: &serde_json::Map<String, Value>) -> bool {
    map.len() == ISSUED_AMOUNT_KEYS.len()
        && ISSUED_AMOUNT_KEYS.iter().all(|key| map.contains_key(*key))
}

fn string_field(map: &serde_json::Map<String, Value>, key: &str) -> CodecResult<String> {
    match map.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(CodecError::InvalidFormat(format!(
            "issued amount field '{}' must be a string, got {}",
            key, other
        ))),
        None => Err(CodecError::InvalidInput(format!(
            "issued amount is missing field '{}'",
            key
        ))),
    }
}

/// Errors that can occur while encoding or decoding amounts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Out of range: {0}")]
    OutOfRange(String),
    #[error("Amount overflow: {0}")]
    Overflow(String),
    #[error("Buffer underrun: requested {requested} bytes, {remaining} remaining")]
    BufferUnderrun { requested: usize, remaining: usize },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_is_native() {
        let value = AmountValue::try_from(&json!("100")).unwrap();
        assert_eq!(value, AmountValue::native("100"));
        assert!(value.is_native());
    }

    #[test]
    fn test_three_field_object_is_issued() {
        let value = AmountValue::try_from(&json!({
            "value": "1",
            "currency": "USD",
            "issuer": "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
        }))
        .unwrap();
        assert_eq!(
            value,
            AmountValue::issued("1", "USD", "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh")
        );
    }

    #[test]
    fn test_extra_or_missing_fields_rejected() {
        let extra = json!({"value": "1", "currency": "USD", "issuer": "r", "memo": "x"});
        let missing = json!({"value": "1", "currency": "USD"});
        let renamed = json!({"value": "1", "currency": "USD", "account": "r"});

        for shape in [extra, missing, renamed] {
            assert!(matches!(
                AmountValue::try_from(&shape),
                Err(CodecError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_other_shapes_rejected() {
        for shape in [json!(100), json!(null), json!(["1"]), json!(true)] {
            assert!(matches!(
                AmountValue::try_from(&shape),
                Err(CodecError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_non_string_field_is_invalid_format() {
        let shape = json!({"value": 1, "currency": "USD", "issuer": "r"});
        assert!(matches!(
            AmountValue::try_from(&shape),
            Err(CodecError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_serde_shape_matches_json() {
        let issued = AmountValue::issued("1.5", "USD", "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh");
        assert_eq!(serde_json::to_value(&issued).unwrap(), issued.to_json());

        let native = AmountValue::native("25");
        assert_eq!(serde_json::to_value(&native).unwrap(), json!("25"));

        let parsed: AmountValue = serde_json::from_value(json!("25")).unwrap();
        assert_eq!(parsed, native);
    }
}
