//! # Ledger Amount Codec
//!
//! Canonical binary encoding of ledger amount fields. The encoding is hashed
//! and signed downstream, so it is bit-exact and deterministic.
//!
//! ## Features
//!
//! - **Native amounts**: integer drop strings ↔ 8-byte fields with the
//!   "is positive" bit set
//! - **Issued-currency amounts**: exact decimals normalized to a 16-digit
//!   mantissa and bounded exponent, packed with a 20-byte currency code and
//!   20-byte issuer into 48 bytes
//! - **Self-describing framing**: the leading bit tells a parser whether to
//!   read 8 or 48 bytes
//! - **Peer codecs**: currency codes and account identifiers
//!
//! ## Quick Start
//!
//! ```rust
//! use ledger_amount_codec::{Amount, SerializedType};
//! use serde_json::json;
//!
//! let amount = Amount::from_value(&json!({
//!     "value": "1",
//!     "currency": "USD",
//!     "issuer": "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
//! }))
//! .unwrap();
//! assert!(amount.to_hex().starts_with("D4838D7EA4C68000"));
//!
//! let drops = Amount::from_value(&json!("100")).unwrap();
//! assert_eq!(drops.to_hex(), "4000000000000064");
//! ```

pub mod amount;
pub mod codecs;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use amount::{canonicalize, Amount, CanonicalValue, DecimalContext};
pub use codecs::{AccountId, Currency};
pub use traits::*;
pub use types::*;
pub use utils::{verify_native_value, BinaryParser};
