//! Amount codec: native drops and issued-currency values

pub mod context;
pub mod core;
pub mod issued;
pub mod native;

pub use context::DecimalContext;
pub use self::core::Amount;
pub use issued::{canonicalize, CanonicalValue};
