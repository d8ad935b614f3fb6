//! Peer field codecs embedded in issued-currency amounts

pub mod account_id;
pub mod currency;

pub use account_id::*;
pub use currency::*;
