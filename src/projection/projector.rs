//! Month-by-month cumulative spend for a plan.
//!
//! Months are a flat 30 days (720 hours); calendar lengths are deliberately not
//! used so figures stay comparable across plans and runs.

use std::collections::BTreeMap;

use rayon::prelude::*;
use rust_decimal::Decimal;

use crate::domain::{Price, PricingIndex, PricingRecord, Projection, TypeAtLocation};

pub const MONTHS_PER_YEAR: u32 = 12;
pub const HOURS_PER_MONTH: u32 = 24 * 30;

/// Cumulative spend after each month of `horizon_years` years.
///
/// The result has exactly `horizon_years * 12` points. The upfront fee is
/// charged at the start of every year that is a multiple of the commitment
/// length (always including year 0).
///
/// Amounts within `MAX_AMOUNT` never reach the `Decimal` limit; anything
/// larger (only possible for a hand-built `Price`) saturates instead of panicking.
pub fn project(price: &Price, horizon_years: u32) -> Vec<Decimal> {
    let monthly = price.hourly.saturating_mul(Decimal::from(HOURS_PER_MONTH));
    let term = price.years.get();

    let mut spent = Decimal::ZERO;
    let mut points = Vec::with_capacity(horizon_years as usize * MONTHS_PER_YEAR as usize);
    for year in 0..horizon_years {
        if year % term == 0 {
            spent = spent.saturating_add(price.up_front);
        }
        for _ in 0..MONTHS_PER_YEAR {
            spent = spent.saturating_add(monthly);
            points.push(spent);
        }
    }
    points
}

/// Project every plan of one index entry, in the entry's plan order.
pub fn project_plans(record: &PricingRecord, horizon_years: u32) -> Vec<Projection> {
    record
        .prices
        .iter()
        .map(|price| Projection {
            label: price.display_name(),
            price: price.clone(),
            points: project(price, horizon_years),
        })
        .collect()
}

/// Project every plan of every key.
pub fn project_index(
    index: &PricingIndex,
    horizon_years: u32,
) -> BTreeMap<TypeAtLocation, Vec<Projection>> {
    index
        .par_iter()
        .map(|(key, record)| (key.clone(), project_plans(record, horizon_years)))
        .collect()
}
