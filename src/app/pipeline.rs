//! Shared pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load price list -> normalize -> project every plan of every key
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::collections::BTreeMap;

use tracing::info;

use crate::domain::{NormalizedCatalog, Projection, RunConfig, TypeAtLocation};
use crate::error::AppError;
use crate::io::catalog::{PriceDoc, load_price_doc};
use crate::normalize::normalize;
use crate::projection::project_index;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub catalog: NormalizedCatalog,
    pub projections: BTreeMap<TypeAtLocation, Vec<Projection>>,
    pub horizon_years: u32,
}

impl RunOutput {
    pub fn projections_for(&self, key: &TypeAtLocation) -> Option<&[Projection]> {
        self.projections.get(key).map(Vec::as_slice)
    }
}

/// Execute the full pipeline and return the computed outputs.
pub fn run(config: &RunConfig) -> Result<RunOutput, AppError> {
    let doc = load_price_doc(&config.price_file)?;
    run_with_doc(&doc, config)
}

/// Execute the pipeline on an already loaded document.
pub fn run_with_doc(doc: &PriceDoc, config: &RunConfig) -> Result<RunOutput, AppError> {
    let catalog = normalize(doc, config.duplicate_policy)?;
    let projections = project_index(&catalog.index, config.horizon_years);

    info!(
        keys = catalog.index.len(),
        horizon_years = config.horizon_years,
        "projected payment plans"
    );

    Ok(RunOutput {
        catalog,
        projections,
        horizon_years: config.horizon_years,
    })
}
