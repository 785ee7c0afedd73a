//! Comparison table: instance types × regions for one operating system.
//!
//! Instance types are ordered by family, then generation, then size, so that
//! e.g. `t2.micro` < `t2.small` < `m4.large` < `m4.2xlarge` < `c4.xlarge`.

use std::cmp::Ordering;

use serde::Serialize;

use crate::domain::{NormalizedCatalog, TypeAtLocation};

const FAMILY_ORDER: [&str; 7] = ["t", "m", "c", "g", "r", "i", "hs"];
const SIZE_ORDER: [&str; 5] = ["micro", "small", "medium", "large", "xlarge"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonTable {
    pub os: String,
    pub regions: Vec<String>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub instance_type: String,
    /// One cell per region, `Some` where the index has a priced entry.
    pub cells: Vec<Option<TypeAtLocation>>,
}

impl ComparisonTable {
    pub fn filled_cells(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.cells.iter().filter(|c| c.is_some()).count())
            .sum()
    }
}

pub fn build_table(catalog: &NormalizedCatalog, os: &str) -> ComparisonTable {
    let regions = catalog.dimensions.regions.clone();
    let instance_types =
        sort_instance_types(catalog.dimensions.instance_types.iter().map(String::as_str));

    let rows = instance_types
        .into_iter()
        .map(|instance_type| {
            let cells = regions
                .iter()
                .map(|region| {
                    let key = TypeAtLocation::new(os, region.as_str(), instance_type.as_str());
                    catalog.get(&key).map(|_| key)
                })
                .collect();
            TableRow { instance_type, cells }
        })
        .collect();

    ComparisonTable {
        os: os.to_string(),
        regions,
        rows,
    }
}

/// Sort key for instance type names of the form `<family><generation>.<size>`.
///
/// Unknown families and sizes rank first within their group; names that do not
/// follow the pattern score 0.
pub fn instance_type_score(name: &str) -> u64 {
    let Some((head, size)) = name.split_once('.') else {
        return 0;
    };

    let family_len = head.find(|c: char| !c.is_ascii_lowercase()).unwrap_or(head.len());
    let (family, generation) = head.split_at(family_len);
    if family.is_empty()
        || generation.is_empty()
        || !generation.chars().all(|c| c.is_ascii_digit())
    {
        return 0;
    }
    let generation: u64 = generation.parse().unwrap_or(0);

    let digits = size.find(|c: char| !c.is_ascii_digit()).unwrap_or(size.len());
    let (multiplier, size_name) = size.split_at(digits);
    let multiplier: u64 = multiplier.parse().unwrap_or(0);

    let family_rank = FAMILY_ORDER.iter().position(|f| *f == family).unwrap_or(0) as u64;
    let size_rank = SIZE_ORDER.iter().position(|s| *s == size_name).unwrap_or(0) as u64;

    family_rank * 10_000 + generation * 1_000 + size_rank * 100 + multiplier
}

pub fn sort_instance_types<'a>(types: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = types.into_iter().map(str::to_string).collect();
    out.sort_by(|a, b| compare_instance_types(a, b));
    out
}

fn compare_instance_types(a: &str, b: &str) -> Ordering {
    instance_type_score(a)
        .cmp(&instance_type_score(b))
        .then_with(|| a.cmp(b))
}
