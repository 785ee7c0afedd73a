//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built once by the normalizer and never mutated afterwards
//! - handed to renderers (terminal views, or an external HTML report)
//! - compared directly in tests

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::num::NonZeroU32;
use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Plan name used for terms that carry no purchase option.
pub const ON_DEMAND: &str = "On Demand";

/// Default projection horizon (years).
pub const DEFAULT_HORIZON_YEARS: u32 = 3;

/// Largest accepted upfront fee or hourly rate: 1,000,000,000,000 USD.
///
/// Keeps `hourly * 8640 * years + up_front * years` inside `Decimal` for any
/// `u32` horizon.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Index key: one instance type, running one operating system, in one region.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TypeAtLocation {
    pub os: String,
    pub region: String,
    pub instance_type: String,
}

impl TypeAtLocation {
    pub fn new(
        os: impl Into<String>,
        region: impl Into<String>,
        instance_type: impl Into<String>,
    ) -> Self {
        Self {
            os: os.into(),
            region: region.into(),
            instance_type: instance_type.into(),
        }
    }
}

impl fmt::Display for TypeAtLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.instance_type, self.region, self.os)
    }
}

/// A canonical purchase plan.
///
/// Amounts are USD. `years` is the commitment length; on-demand plans use 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Price {
    pub name: String,
    pub up_front: Decimal,
    pub hourly: Decimal,
    pub years: NonZeroU32,
}

impl Price {
    /// Build a plan, rejecting negative or oversized amounts and a zero commitment.
    pub fn new(
        name: impl Into<String>,
        up_front: Decimal,
        hourly: Decimal,
        years: u32,
    ) -> Result<Self, String> {
        if up_front < Decimal::ZERO {
            return Err(format!("negative upfront amount {up_front}"));
        }
        if hourly < Decimal::ZERO {
            return Err(format!("negative hourly rate {hourly}"));
        }
        if up_front > MAX_AMOUNT || hourly > MAX_AMOUNT {
            return Err(format!("amount exceeds {MAX_AMOUNT} USD"));
        }
        let years =
            NonZeroU32::new(years).ok_or_else(|| "commitment length must be positive".to_string())?;
        Ok(Self {
            name: name.into(),
            up_front,
            hourly,
            years,
        })
    }

    pub fn is_on_demand(&self) -> bool {
        self.name == ON_DEMAND
    }

    /// `false` for plans with neither an upfront fee nor an hourly rate.
    pub fn carries_cost(&self) -> bool {
        !self.up_front.is_zero() || !self.hourly.is_zero()
    }

    /// Label used for chart series and tables, e.g. `Partial Upfront (3 years)`.
    pub fn display_name(&self) -> String {
        if self.is_on_demand() {
            return self.name.clone();
        }
        format!("{} ({} years)", self.name, self.years)
    }
}

/// One catalog product (SKU) as published in the offer file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub sku: String,
    #[serde(rename = "productFamily", default)]
    pub product_family: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Product {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Informational header fields of the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogMeta {
    pub disclaimer: String,
    pub version: String,
    pub publication_date: String,
}

impl CatalogMeta {
    /// The publication date, when it is RFC 3339 (the offer files use `...Z`).
    pub fn published_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(self.publication_date.trim()).ok()
    }
}

/// Distinct values observed along each axis of the index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub operating_systems: BTreeSet<String>,
    /// Every region of the region table, in table order.
    pub regions: Vec<String>,
    pub instance_types: BTreeSet<String>,
}

/// Priced plans for one index key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricingRecord {
    pub product: Product,
    /// Never empty; zero-cost plans are excluded.
    pub prices: Vec<Price>,
    pub instance_location: TypeAtLocation,
}

pub type PricingIndex = BTreeMap<TypeAtLocation, PricingRecord>;

/// Normalizer output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedCatalog {
    pub meta: CatalogMeta,
    pub dimensions: Dimensions,
    pub index: PricingIndex,
}

impl NormalizedCatalog {
    pub fn get(&self, key: &TypeAtLocation) -> Option<&PricingRecord> {
        self.index.get(key)
    }

    /// Keys for a single operating system, in index order.
    pub fn keys_for_os<'a>(&'a self, os: &'a str) -> impl Iterator<Item = &'a TypeAtLocation> + 'a {
        self.index.keys().filter(move |k| k.os == os)
    }
}

/// Cumulative spend series for one plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub label: String,
    pub price: Price,
    /// One cumulative total per elapsed month.
    pub points: Vec<Decimal>,
}

impl Projection {
    /// Spend at the end of the horizon (zero for an empty horizon).
    pub fn total(&self) -> Decimal {
        self.points.last().copied().unwrap_or(Decimal::ZERO)
    }
}

/// What to do when two products resolve to the same index key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Keep the product that comes later in the document (logged as a warning).
    #[default]
    LastWriteWins,
    /// Abort the run.
    Reject,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub price_file: PathBuf,
    pub horizon_years: u32,
    pub duplicate_policy: DuplicatePolicy,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn display_name_includes_commitment_for_reserved_plans() {
        let od = Price::new(ON_DEMAND, dec!(0), dec!(0.1), 1).unwrap();
        let ri = Price::new("Partial Upfront", dec!(120), dec!(0.05), 3).unwrap();
        assert_eq!(od.display_name(), "On Demand");
        assert_eq!(ri.display_name(), "Partial Upfront (3 years)");
    }

    #[test]
    fn price_rejects_zero_years_and_negative_amounts() {
        assert!(Price::new("All Upfront", dec!(10), dec!(0), 0).is_err());
        assert!(Price::new("All Upfront", dec!(-1), dec!(0), 1).is_err());
        assert!(Price::new(ON_DEMAND, dec!(0), dec!(-0.01), 1).is_err());
        assert!(Price::new(ON_DEMAND, dec!(0), dec!(0), 1).is_ok());
    }

    #[test]
    fn price_rejects_amounts_above_the_cap() {
        assert_eq!(MAX_AMOUNT, dec!(1000000000000));
        assert!(Price::new(ON_DEMAND, dec!(0), MAX_AMOUNT, 1).is_ok());
        assert!(Price::new(ON_DEMAND, dec!(0), Decimal::MAX, 1).is_err());
        assert!(Price::new("All Upfront", MAX_AMOUNT + dec!(0.01), dec!(0), 3).is_err());
    }

    #[test]
    fn zero_plan_carries_no_cost() {
        let zero = Price::new(ON_DEMAND, dec!(0.00), dec!(0.0000000000), 1).unwrap();
        assert!(!zero.carries_cost());
        let upfront_only = Price::new("All Upfront", dec!(600), dec!(0), 1).unwrap();
        assert!(upfront_only.carries_cost());
    }

    #[test]
    fn published_at_parses_offer_file_timestamps() {
        let meta = CatalogMeta {
            publication_date: "2015-12-09T14:45:27Z".to_string(),
            ..CatalogMeta::default()
        };
        assert_eq!(meta.published_at().unwrap().format("%Y-%m-%d").to_string(), "2015-12-09");

        let bad = CatalogMeta {
            publication_date: "yesterday".to_string(),
            ..CatalogMeta::default()
        };
        assert!(bad.published_at().is_none());
    }
}
