//! Plan comparison for one index key.
//!
//! Summarizes each projection against the On Demand plan:
//! - spend at the end of every projected year
//! - difference against On Demand at the end of the horizon
//! - break-even month (first month at or below On Demand's cumulative spend)

use rust_decimal::Decimal;

use crate::domain::Projection;
use crate::projection::MONTHS_PER_YEAR;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSummary {
    pub label: String,
    pub up_front: Decimal,
    pub hourly: Decimal,
    /// Cumulative spend at the end of year 1, 2, ...
    pub yearly_totals: Vec<Decimal>,
    pub total: Decimal,
    /// `total - on_demand_total`; `None` without an On Demand plan.
    pub vs_on_demand: Option<Decimal>,
    /// 1-based month; `None` for On Demand itself or when never reached.
    pub break_even_month: Option<usize>,
    /// Lowest total at the end of the horizon (ties all marked).
    pub cheapest: bool,
}

pub fn summarize_plans(projections: &[Projection]) -> Vec<PlanSummary> {
    let on_demand = projections.iter().find(|p| p.price.is_on_demand());
    let cheapest_total = projections.iter().map(Projection::total).min();

    projections
        .iter()
        .map(|p| {
            let total = p.total();
            let yearly_totals = p
                .points
                .iter()
                .skip(MONTHS_PER_YEAR as usize - 1)
                .step_by(MONTHS_PER_YEAR as usize)
                .copied()
                .collect();
            let (vs_on_demand, break_even_month) = match on_demand {
                Some(od) if !p.price.is_on_demand() => {
                    (Some(total - od.total()), break_even_month(p, od))
                }
                Some(_) => (Some(Decimal::ZERO), None),
                None => (None, None),
            };
            PlanSummary {
                label: p.label.clone(),
                up_front: p.price.up_front,
                hourly: p.price.hourly,
                yearly_totals,
                total,
                vs_on_demand,
                break_even_month,
                cheapest: cheapest_total == Some(total),
            }
        })
        .collect()
}

fn break_even_month(plan: &Projection, on_demand: &Projection) -> Option<usize> {
    plan.points
        .iter()
        .zip(on_demand.points.iter())
        .position(|(cost, od)| cost <= od)
        .map(|idx| idx + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ON_DEMAND, Price};
    use crate::projection::project;
    use rust_decimal_macros::dec;

    fn projection(name: &str, up_front: Decimal, hourly: Decimal, years: u32) -> Projection {
        let price = Price::new(name, up_front, hourly, years).unwrap();
        Projection {
            label: price.display_name(),
            points: project(&price, 3),
            price,
        }
    }

    #[test]
    fn summarizes_against_on_demand() {
        let plans = vec![
            projection(ON_DEMAND, dec!(0), dec!(0.10), 1),
            projection("All Upfront", dec!(1000), dec!(0), 3),
        ];
        let summaries = summarize_plans(&plans);

        let od = &summaries[0];
        assert_eq!(od.yearly_totals, vec![dec!(864), dec!(1728), dec!(2592)]);
        assert_eq!(od.vs_on_demand, Some(Decimal::ZERO));
        assert_eq!(od.break_even_month, None);
        assert!(!od.cheapest);

        let ri = &summaries[1];
        assert_eq!(ri.total, dec!(1000));
        assert_eq!(ri.vs_on_demand, Some(dec!(-1592)));
        // On Demand passes 1000 after month 14 (72 * 14 = 1008).
        assert_eq!(ri.break_even_month, Some(14));
        assert!(ri.cheapest);
    }

    #[test]
    fn no_on_demand_plan_means_no_comparison() {
        let plans = vec![projection("No Upfront", dec!(0), dec!(0.05), 1)];
        let summaries = summarize_plans(&plans);
        assert_eq!(summaries[0].vs_on_demand, None);
        assert_eq!(summaries[0].break_even_month, None);
        assert!(summaries[0].cheapest);
    }

    #[test]
    fn plan_that_never_breaks_even() {
        let plans = vec![
            projection(ON_DEMAND, dec!(0), dec!(0.01), 1),
            projection("All Upfront", dec!(5000), dec!(0), 3),
        ];
        let summaries = summarize_plans(&plans);
        assert_eq!(summaries[1].break_even_month, None);
        assert!(summaries[0].cheapest);
    }
}
