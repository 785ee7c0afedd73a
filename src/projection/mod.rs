//! Cumulative cost projection.
//!
//! Turns one plan into a month-by-month series of cumulative spend, charging
//! the upfront fee again at every commitment renewal.

pub mod projector;

pub use projector::*;
