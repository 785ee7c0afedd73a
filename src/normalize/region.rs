//! Location name → region code table.
//!
//! The price list identifies regions by display name (`"EU (Ireland)"`), while
//! everything downstream uses region codes (`"eu-west-1"`). The table is static
//! configuration, passed into the normalizer by value so tests can substitute
//! their own.

use crate::error::PricingError;

/// Locations known to the `v1.0` EC2 offer file.
pub const AWS_LOCATIONS: [(&str, &str); 11] = [
    ("Asia Pacific (Seoul)", "ap-northeast-2"),
    ("Asia Pacific (Singapore)", "ap-southeast-1"),
    ("Asia Pacific (Sydney)", "ap-southeast-2"),
    ("Asia Pacific (Tokyo)", "ap-northeast-1"),
    ("AWS GovCloud (US)", "us-gov-west-1"),
    ("EU (Frankfurt)", "eu-central-1"),
    ("EU (Ireland)", "eu-west-1"),
    ("US East (N. Virginia)", "us-east-1"),
    ("US West (N. California)", "us-west-1"),
    ("US West (Oregon)", "us-west-2"),
    ("South America (Sao Paulo)", "sa-east-1"),
];

#[derive(Debug, Clone, Copy)]
pub struct RegionTable<'a> {
    entries: &'a [(&'a str, &'a str)],
}

impl RegionTable<'static> {
    pub const fn aws() -> Self {
        Self { entries: &AWS_LOCATIONS }
    }
}

impl Default for RegionTable<'static> {
    fn default() -> Self {
        Self::aws()
    }
}

impl<'a> RegionTable<'a> {
    pub const fn new(entries: &'a [(&'a str, &'a str)]) -> Self {
        Self { entries }
    }

    pub fn lookup(&self, location: &str) -> Option<&'a str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == location)
            .map(|(_, code)| *code)
    }

    /// Resolve the location of product `sku`, failing on unknown locations.
    pub fn resolve(&self, sku: &str, location: &str) -> Result<&'a str, PricingError> {
        self.lookup(location).ok_or_else(|| PricingError::Lookup {
            sku: sku.to_string(),
            location: location.to_string(),
        })
    }

    /// All region codes, in table order, without repeats.
    pub fn regions(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.entries.len());
        for (_, code) in self.entries {
            if !out.iter().any(|c| c == code) {
                out.push(code.to_string());
            }
        }
        out
    }
}
