//! Offer-file (price list JSON) model and loader.
//!
//! The raw document is deserialized as-is with `serde`; all interpretation
//! (filtering, key resolution, term parsing) happens in `normalize`. Products
//! and terms keep document order (`IndexMap`), which decides which product wins
//! a shared key and the order of a key's plans.
//!
//! Loading is two-phase: the header (`formatVersion`, `offerCode`) is checked
//! first, so a catalog of another schema is rejected with a schema error rather
//! than with whatever JSON shape mismatch it would hit further down.

use std::collections::BTreeMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::domain::Product;
use crate::error::{AppError, EXIT_INPUT};
use crate::normalize::validate_schema;

/// Terms for one SKU, keyed by term code (`<sku>.<offerTermCode>`).
pub type SkuTerms = IndexMap<String, RawTerm>;

/// The whole price list document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDoc {
    #[serde(default)]
    pub format_version: String,
    #[serde(default)]
    pub offer_code: String,
    #[serde(default)]
    pub disclaimer: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub publication_date: String,
    #[serde(default)]
    pub products: IndexMap<String, Product>,
    #[serde(default)]
    pub terms: TermCollections,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TermCollections {
    #[serde(rename = "OnDemand", default)]
    pub on_demand: IndexMap<String, SkuTerms>,
    #[serde(rename = "Reserved", default)]
    pub reserved: IndexMap<String, SkuTerms>,
}

/// One pricing term as published.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTerm {
    #[serde(default)]
    pub price_dimensions: IndexMap<String, PriceDimension>,
    #[serde(default)]
    pub term_attributes: TermAttributes,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TermAttributes {
    #[serde(rename = "LeaseContractLength", default)]
    pub lease_contract_length: Option<String>,
    #[serde(rename = "PurchaseOption", default)]
    pub purchase_option: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDimension {
    #[serde(default)]
    pub unit: String,
    /// Amounts per currency, as decimal strings (e.g. `{"USD": "0.0130000000"}`).
    #[serde(default)]
    pub price_per_unit: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocHeader {
    #[serde(default)]
    format_version: String,
    #[serde(default)]
    offer_code: String,
}

/// Read and parse a price list file.
pub fn load_price_doc(path: &Path) -> Result<PriceDoc, AppError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        AppError::new(
            EXIT_INPUT,
            format!("Failed to read price list '{}': {e}", path.display()),
        )
    })?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "read price list");
    parse_price_doc(&text)
}

/// Parse a price list from JSON text, validating the header first.
pub fn parse_price_doc(text: &str) -> Result<PriceDoc, AppError> {
    let header: DocHeader = serde_json::from_str(text)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid price list JSON: {e}")))?;
    validate_schema(&header.format_version, &header.offer_code)?;

    serde_json::from_str(text)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid price list JSON: {e}")))
}
