//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the index key (`TypeAtLocation`) and canonical plan (`Price`)
//! - normalizer outputs (`PricingRecord`, `Dimensions`, `NormalizedCatalog`)
//! - projection outputs (`Projection`) and run configuration

pub mod types;

pub use types::*;
