//! Formatted terminal output.
//!
//! All text rendering lives here so that:
//! - the normalizer and projector stay free of presentation concerns
//! - output changes are localized (golden tests below)

use rust_decimal::Decimal;

use crate::domain::{NormalizedCatalog, TypeAtLocation};
use crate::report::{ComparisonTable, PlanSummary};

const TYPE_HEADER: &str = "instance type";

/// Catalog meta, dimension counts, index size, keys per OS.
pub fn format_catalog_summary(catalog: &NormalizedCatalog, horizon_years: u32) -> String {
    let mut out = String::new();

    out.push_str("=== plans - EC2 payment plan comparison ===\n");
    out.push_str(&format!("Catalog version: {}\n", catalog.meta.version));
    let published = match catalog.meta.published_at() {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S %:z").to_string(),
        None => catalog.meta.publication_date.clone(),
    };
    out.push_str(&format!("Published: {published}\n"));
    if !catalog.meta.disclaimer.is_empty() {
        out.push_str(&format!("Disclaimer: {}\n", truncate(&catalog.meta.disclaimer, 96)));
    }

    let dims = &catalog.dimensions;
    out.push_str(&format!(
        "Dimensions: os={} | regions={} | instance types={}\n",
        dims.operating_systems.len(),
        dims.regions.len(),
        dims.instance_types.len(),
    ));
    let plans: usize = catalog.index.values().map(|r| r.prices.len()).sum();
    out.push_str(&format!(
        "Index: keys={} | plans={} | horizon={}y\n",
        catalog.index.len(),
        plans,
        horizon_years,
    ));

    out.push_str("\nKeys per OS:\n");
    for os in &dims.operating_systems {
        out.push_str(&format!("  {:<20} {:>6}\n", os, catalog.keys_for_os(os).count()));
    }

    out
}

/// Text grid: one row per instance type, `x` where a region prices it.
pub fn format_table(table: &ComparisonTable) -> String {
    let type_width = table
        .rows
        .iter()
        .map(|r| r.instance_type.len())
        .chain(std::iter::once(TYPE_HEADER.len()))
        .max()
        .unwrap_or(TYPE_HEADER.len());
    let widths: Vec<usize> = table.regions.iter().map(|r| r.len().max(3)).collect();

    let mut out = String::new();
    out.push_str(&format!("Comparison table: {}\n", table.os));

    let mut header = format!("{TYPE_HEADER:<type_width$}");
    let mut rule = format!("{:-<type_width$}", "");
    for (region, w) in table.regions.iter().zip(widths.iter().copied()) {
        header.push_str(&format!(" {region:>w$}"));
        rule.push_str(&format!(" {:-<w$}", ""));
    }
    out.push_str(header.trim_end());
    out.push('\n');
    out.push_str(rule.trim_end());
    out.push('\n');

    for row in &table.rows {
        let mut line = format!("{:<type_width$}", row.instance_type);
        for (cell, w) in row.cells.iter().zip(widths.iter().copied()) {
            let mark = if cell.is_some() { "x" } else { "-" };
            line.push_str(&format!(" {mark:>w$}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    let total = table.rows.len() * table.regions.len();
    out.push_str(&format!(
        "\n{}/{} cells priced (x = priced, - = not offered)\n",
        table.filled_cells(),
        total
    ));

    out
}

/// Per-plan comparison for one key. The cheapest plan is starred.
pub fn format_plan_summary(
    key: &TypeAtLocation,
    summaries: &[PlanSummary],
    horizon_years: u32,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("Key: {key}\n"));
    out.push_str(&format!("Horizon: {horizon_years} years (720-hour months)\n\n"));

    let mut header = format!("  {:<28} {:>10} {:>8}", "plan", "upfront", "hourly");
    for year in 1..=horizon_years {
        header.push_str(&format!(" {:>10}", format!("year {year}")));
    }
    header.push_str(&format!(" {:>10} {:>10}", "vs OD", "break-even"));
    out.push_str(header.trim_end());
    out.push('\n');

    for s in summaries {
        let marker = if s.cheapest { "*" } else { " " };
        let mut line = format!(
            "{marker} {:<28} {:>10} {:>8}",
            truncate(&s.label, 28),
            money(s.up_front),
            format!("{:.4}", s.hourly),
        );
        for total in &s.yearly_totals {
            line.push_str(&format!(" {:>10}", money(*total)));
        }
        let vs = s.vs_on_demand.map(money).unwrap_or_else(|| "-".to_string());
        let be = s
            .break_even_month
            .map(|m| format!("month {m}"))
            .unwrap_or_else(|| "-".to_string());
        line.push_str(&format!(" {vs:>10} {be:>10}"));
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

fn money(v: Decimal) -> String {
    format!("{:.2}", v.round_dp(2))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        CatalogMeta, Dimensions, ON_DEMAND, Price, PricingRecord, Product, Projection,
    };
    use crate::projection::project;
    use crate::report::{TableRow, summarize_plans};
    use rust_decimal_macros::dec;

    #[test]
    fn table_golden_snapshot() {
        let table = ComparisonTable {
            os: "Linux".to_string(),
            regions: vec!["us-east-1".to_string(), "eu-west-1".to_string()],
            rows: vec![
                TableRow {
                    instance_type: "t2.micro".to_string(),
                    cells: vec![None, Some(TypeAtLocation::new("Linux", "eu-west-1", "t2.micro"))],
                },
                TableRow {
                    instance_type: "m4.large".to_string(),
                    cells: vec![None, None],
                },
            ],
        };

        let expected = concat!(
            "Comparison table: Linux\n",
            "instance type us-east-1 eu-west-1\n",
            "------------- --------- ---------\n",
            "t2.micro              -         x\n",
            "m4.large              -         -\n",
            "\n",
            "1/4 cells priced (x = priced, - = not offered)\n",
        );
        assert_eq!(format_table(&table), expected);
    }

    #[test]
    fn catalog_summary_counts_keys_per_os() {
        let linux = TypeAtLocation::new("Linux", "us-east-1", "m4.large");
        let record = PricingRecord {
            product: Product {
                sku: "SKU1".to_string(),
                product_family: None,
                attributes: Default::default(),
            },
            prices: vec![Price::new(ON_DEMAND, dec!(0), dec!(0.12), 1).unwrap()],
            instance_location: linux.clone(),
        };
        let mut catalog = NormalizedCatalog {
            meta: CatalogMeta {
                disclaimer: "Prices shown are illustrative.".to_string(),
                version: "20160101000000".to_string(),
                publication_date: "2016-01-01T00:00:00Z".to_string(),
            },
            dimensions: Dimensions {
                operating_systems: ["Linux".to_string(), "Windows".to_string()]
                    .into_iter()
                    .collect(),
                regions: vec!["us-east-1".to_string()],
                instance_types: ["m4.large".to_string()].into_iter().collect(),
            },
            ..NormalizedCatalog::default()
        };
        catalog.index.insert(linux, record);

        let txt = format_catalog_summary(&catalog, 3);
        assert!(txt.contains("Catalog version: 20160101000000\n"));
        assert!(txt.contains("Published: 2016-01-01 00:00:00 +00:00\n"));
        assert!(txt.contains("Dimensions: os=2 | regions=1 | instance types=1\n"));
        assert!(txt.contains("Index: keys=1 | plans=1 | horizon=3y\n"));
        assert!(txt.contains(&format!("  {:<20} {:>6}\n", "Linux", 1)));
        assert!(txt.contains(&format!("  {:<20} {:>6}\n", "Windows", 0)));
    }

    #[test]
    fn plan_summary_lists_years_and_break_even() {
        let key = TypeAtLocation::new("Linux", "us-east-1", "m4.large");
        let od = Price::new(ON_DEMAND, dec!(0), dec!(0.10), 1).unwrap();
        let ri = Price::new("All Upfront", dec!(1000), dec!(0), 3).unwrap();
        let projections: Vec<Projection> = [od, ri]
            .into_iter()
            .map(|price| Projection {
                label: price.display_name(),
                points: project(&price, 3),
                price,
            })
            .collect();

        let txt = format_plan_summary(&key, &summarize_plans(&projections), 3);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Key: m4.large / us-east-1 / Linux");
        assert!(lines[3].contains("year 1") && lines[3].contains("year 3"));
        assert!(lines[4].starts_with("  On Demand"));
        assert!(lines[4].contains("864.00") && lines[4].contains("2592.00"));
        assert!(lines[5].starts_with("* All Upfront (3 years)"));
        assert!(lines[5].contains("-1592.00"));
        assert!(lines[5].ends_with("month 14"));
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
