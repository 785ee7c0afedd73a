//! `ec2-plans` library crate.
//!
//! The binary (`plans`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the normalizer and projector are reusable by other renderers

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod normalize;
pub mod plot;
pub mod projection;
pub mod report;
pub mod tui;
