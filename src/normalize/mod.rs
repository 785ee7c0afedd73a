//! Price list normalization.
//!
//! - location → region code table (`region`)
//! - pricing term → `Price` (`term`)
//! - product filtering, key resolution, index assembly (`index`)

pub mod index;
pub mod region;
pub mod term;

pub use index::*;
pub use region::*;
pub use term::*;
