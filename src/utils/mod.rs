//! Utility modules

pub mod base58;
pub mod parser;
pub mod validation;

pub use parser::*;
pub use validation::*;
