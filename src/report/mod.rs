//! Reporting: comparison tables, plan summaries, formatted terminal output.

pub mod compare;
pub mod format;
pub mod table;

pub use compare::*;
pub use format::*;
pub use table::*;
