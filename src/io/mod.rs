//! Input helpers.
//!
//! - price list JSON model + loader (`catalog`)

pub mod catalog;

pub use catalog::*;
