//! Annuitized layout cost.
//!
//! ```text
//! investment = Σ 2 · length · price/m · AF(lifetime, i)     (two conductors)
//! O&M        = Σ investment_line · om_factor
//! losses     = P_loss · loss_hours · electricity_price
//! fitness    = investment + O&M + losses                     [CHF/yr]
//! ```

use super::individual::Individual;
use super::problem::CandidateNetwork;
use crate::config::PlanningConfig;
use cea_core::LineCatalog;
use serde::Serialize;

/// Annuity (capital recovery) factor
///
/// AF = (1+i)^n · i / ((1+i)^n − 1), falling back to 1/n without interest.
pub fn annuity_factor(lifetime_years: u32, interest_rate: f64) -> f64 {
    let n = lifetime_years.max(1) as f64;
    let i = interest_rate;
    if i.abs() < 1e-10 {
        1.0 / n
    } else {
        let growth = (1.0 + i).powf(n);
        growth * i / (growth - 1.0)
    }
}

/// Yearly cost components of one layout (CHF/yr).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CostBreakdown {
    pub investment: f64,
    pub operation_maintenance: f64,
    pub losses: f64,
    pub total: f64,
}

impl CostBreakdown {
    pub fn infeasible() -> Self {
        Self {
            total: f64::INFINITY,
            ..Self::default()
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.total.is_finite()
    }
}

/// Cost of a layout given the peak power loss (kW) of its load flow.
///
/// An infinite loss (infeasible load flow) or a gene outside the catalog
/// yields an infinite total.
pub fn evaluate_individual(
    individual: &Individual,
    network: &CandidateNetwork,
    power_loss_kw: f64,
    catalog: &LineCatalog,
    config: &PlanningConfig,
) -> CostBreakdown {
    let mut cost = CostBreakdown::default();

    for (edge, &gene) in network.edges.iter().zip(individual.genes.iter()) {
        if gene == 0 {
            continue;
        }
        let Some(line) = catalog.get(gene) else {
            return CostBreakdown::infeasible();
        };
        let investment = 2.0
            * edge.length.value()
            * line.price_per_m
            * annuity_factor(line.lifetime_years, config.interest_rate);
        cost.investment += investment;
        cost.operation_maintenance += investment * line.om_factor;
    }

    cost.losses = power_loss_kw * config.loss_hours * config.electricity_price_chf_per_kwh;
    cost.total = cost.investment + cost.operation_maintenance + cost.losses;
    if !cost.total.is_finite() || power_loss_kw.is_nan() {
        cost.total = f64::INFINITY;
    }
    cost
}
