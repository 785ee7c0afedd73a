//! Pricing term → canonical `Price`.
//!
//! A term carries a purchase option and a lease length (both absent for
//! on-demand terms) plus a set of price dimensions. Only two dimension units
//! matter:
//!
//! - `Quantity`: the upfront fee
//! - `Hrs`: the hourly rate
//!
//! Everything else (e.g. per-GB dimensions) is ignored.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::{MAX_AMOUNT, ON_DEMAND, Price};
use crate::error::PricingError;
use crate::io::catalog::{PriceDimension, RawTerm};

pub const UNIT_UPFRONT: &str = "Quantity";
pub const UNIT_HOURLY: &str = "Hrs";
pub const CURRENCY: &str = "USD";

/// Parse one term. `context` names the term in error messages.
pub fn parse_term(context: &str, term: &RawTerm) -> Result<Price, PricingError> {
    let attrs = &term.term_attributes;
    let name = attrs.purchase_option.as_deref().unwrap_or(ON_DEMAND);

    let years = match attrs.lease_contract_length.as_deref() {
        Some(raw) => parse_lease_years(raw).map_err(|msg| PricingError::format(context, msg))?,
        None => 1,
    };

    let mut up_front = Decimal::ZERO;
    let mut hourly = Decimal::ZERO;
    for (key, dimension) in &term.price_dimensions {
        let amount = || parse_amount(dimension).map_err(|msg| dimension_error(context, key, msg));
        match dimension.unit.as_str() {
            UNIT_UPFRONT => up_front = amount()?,
            UNIT_HOURLY => hourly = amount()?,
            _ => {}
        }
    }

    Price::new(name, up_front, hourly, years).map_err(|msg| PricingError::format(context, msg))
}

/// Commitment length in years from strings like `1yr`, `3yr` or `3 yr`.
pub fn parse_lease_years(raw: &str) -> Result<u32, String> {
    let digits = raw
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_alphabetic())
        .trim_end();
    let years = digits
        .parse::<u32>()
        .map_err(|_| format!("invalid lease length '{raw}'"))?;
    if years == 0 {
        return Err(format!("invalid lease length '{raw}': commitment length must be positive"));
    }
    Ok(years)
}

fn parse_amount(dimension: &PriceDimension) -> Result<Decimal, String> {
    let raw = dimension
        .price_per_unit
        .get(CURRENCY)
        .ok_or_else(|| format!("no {CURRENCY} amount for unit '{}'", dimension.unit))?;
    let amount = Decimal::from_str(raw.trim()).map_err(|e| format!("invalid amount '{raw}': {e}"))?;
    if amount < Decimal::ZERO {
        return Err(format!("negative amount '{raw}'"));
    }
    if amount > MAX_AMOUNT {
        return Err(format!("amount '{raw}' exceeds {MAX_AMOUNT} USD"));
    }
    Ok(amount)
}

fn dimension_error(context: &str, key: &str, msg: String) -> PricingError {
    PricingError::format(format!("{context} dimension {key}"), msg)
}
