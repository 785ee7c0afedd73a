//! Price list → pricing index.
//!
//! Steps:
//! 1. check the document header (`v1.0` / `AmazonEC2`)
//! 2. keep only `Compute Instance` products
//! 3. collect the dimension sets (operating systems, instance types, regions)
//! 4. per product: resolve its key, parse all of its terms, drop zero-cost plans
//!
//! Step 4 runs in parallel. Results are gathered back in document order and the
//! first error in that order aborts the run, so the outcome never depends on thread
//! scheduling.

use std::collections::BTreeSet;
use std::collections::btree_map::Entry;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::domain::{
    CatalogMeta, Dimensions, DuplicatePolicy, NormalizedCatalog, PricingIndex, PricingRecord,
    Product, TypeAtLocation,
};
use crate::error::PricingError;
use crate::io::catalog::{PriceDoc, TermCollections};
use crate::normalize::region::RegionTable;
use crate::normalize::term::parse_term;

pub const FORMAT_VERSION: &str = "v1.0";
pub const OFFER_CODE: &str = "AmazonEC2";
pub const COMPUTE_INSTANCE: &str = "Compute Instance";

pub const ATTR_OS: &str = "operatingSystem";
pub const ATTR_INSTANCE_TYPE: &str = "instanceType";
pub const ATTR_LOCATION: &str = "location";

/// Reject documents of any other schema version or offer.
pub fn validate_schema(format_version: &str, offer_code: &str) -> Result<(), PricingError> {
    if format_version != FORMAT_VERSION {
        return Err(PricingError::Schema {
            field: "formatVersion",
            expected: FORMAT_VERSION,
            found: format_version.to_string(),
        });
    }
    if offer_code != OFFER_CODE {
        return Err(PricingError::Schema {
            field: "offerCode",
            expected: OFFER_CODE,
            found: offer_code.to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    regions: RegionTable<'a>,
    duplicates: DuplicatePolicy,
}

impl<'a> Normalizer<'a> {
    pub fn new(regions: RegionTable<'a>, duplicates: DuplicatePolicy) -> Self {
        Self { regions, duplicates }
    }

    /// Build the pricing index. Any error aborts the whole run.
    pub fn normalize(&self, doc: &PriceDoc) -> Result<NormalizedCatalog, PricingError> {
        validate_schema(&doc.format_version, &doc.offer_code)?;

        let meta = CatalogMeta {
            disclaimer: doc.disclaimer.clone(),
            version: doc.version.clone(),
            publication_date: doc.publication_date.clone(),
        };

        let servers = compute_instances(doc);
        info!(
            products = doc.products.len(),
            compute_instances = servers.len(),
            "filtered price list"
        );

        let dimensions = Dimensions {
            operating_systems: unique_attribute(&servers, ATTR_OS),
            regions: self.regions.regions(),
            instance_types: unique_attribute(&servers, ATTR_INSTANCE_TYPE),
        };

        let records: Vec<Result<Option<PricingRecord>, PricingError>> = servers
            .par_iter()
            .map(|product| self.price_product(product, &doc.terms))
            .collect();

        let mut index = PricingIndex::new();
        for record in records {
            let Some(record) = record? else { continue };
            self.insert(&mut index, record)?;
        }

        info!(keys = index.len(), "built pricing index");
        Ok(NormalizedCatalog {
            meta,
            dimensions,
            index,
        })
    }

    fn price_product(
        &self,
        product: &Product,
        terms: &TermCollections,
    ) -> Result<Option<PricingRecord>, PricingError> {
        let key = self.resolve_key(product)?;

        let on_demand = terms.on_demand.get(&product.sku);
        let reserved = terms.reserved.get(&product.sku);
        if on_demand.is_none() {
            debug!(sku = %product.sku, "no on-demand terms");
        }

        let mut prices = Vec::new();
        let all_terms = on_demand.into_iter().flatten().chain(reserved.into_iter().flatten());
        for (term_key, term) in all_terms {
            let context = format!("SKU {} term {term_key}", product.sku);
            let price = parse_term(&context, term)?;
            if price.carries_cost() {
                prices.push(price);
            } else {
                debug!(sku = %product.sku, term = %term_key, "dropping zero-cost term");
            }
        }

        if prices.is_empty() {
            debug!(sku = %product.sku, key = %key, "no priced terms; product dropped");
            return Ok(None);
        }

        Ok(Some(PricingRecord {
            product: product.clone(),
            prices,
            instance_location: key,
        }))
    }

    fn resolve_key(&self, product: &Product) -> Result<TypeAtLocation, PricingError> {
        let os = required_attribute(product, ATTR_OS)?;
        let instance_type = required_attribute(product, ATTR_INSTANCE_TYPE)?;
        let location = required_attribute(product, ATTR_LOCATION)?;
        let region = self.regions.resolve(&product.sku, location)?;
        Ok(TypeAtLocation::new(os, region, instance_type))
    }

    fn insert(&self, index: &mut PricingIndex, record: PricingRecord) -> Result<(), PricingError> {
        match index.entry(record.instance_location.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(mut slot) => {
                let previous = slot.get().product.sku.clone();
                match self.duplicates {
                    DuplicatePolicy::Reject => {
                        return Err(PricingError::DuplicateKey {
                            key: slot.key().to_string(),
                            first: previous,
                            second: record.product.sku,
                        });
                    }
                    DuplicatePolicy::LastWriteWins => {
                        warn!(
                            key = %slot.key(),
                            replaced = %previous,
                            by = %record.product.sku,
                            "two products share a pricing key; keeping the later one"
                        );
                        slot.insert(record);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Normalize with the built-in AWS region table.
pub fn normalize(
    doc: &PriceDoc,
    duplicates: DuplicatePolicy,
) -> Result<NormalizedCatalog, PricingError> {
    Normalizer::new(RegionTable::aws(), duplicates).normalize(doc)
}

fn compute_instances(doc: &PriceDoc) -> Vec<&Product> {
    doc.products
        .values()
        .filter(|p| p.product_family.as_deref() == Some(COMPUTE_INSTANCE))
        .collect()
}

fn unique_attribute(servers: &[&Product], attribute: &str) -> BTreeSet<String> {
    servers
        .iter()
        .filter_map(|p| p.attribute(attribute))
        .map(str::to_string)
        .collect()
}

fn required_attribute<'p>(product: &'p Product, name: &str) -> Result<&'p str, PricingError> {
    product.attribute(name).ok_or_else(|| {
        PricingError::format(
            format!("SKU {}", product.sku),
            format!("missing attribute `{name}`"),
        )
    })
}
