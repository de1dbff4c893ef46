use super::plants::{PlantDispatch, PlantFleet, PlantKind};
use crate::config::DispatchConfig;
use cea_core::{CeaError, CeaResult, HourlyRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Allocation of one hour's residual demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyDispatch {
    pub hour: usize,
    pub demand_wh: f64,
    pub allocations: Vec<PlantDispatch>,
}

impl HourlyDispatch {
    pub fn cost_chf(&self) -> f64 {
        self.allocations.iter().map(|a| a.marginal_cost_chf).sum()
    }

    pub fn served_wh(&self) -> f64 {
        self.allocations.iter().map(|a| a.thermal_output_wh).sum()
    }

    /// Output of the given technology, zero if it was not started.
    pub fn output_of(&self, kind: PlantKind) -> f64 {
        self.allocations
            .iter()
            .filter(|a| a.kind == kind)
            .map(|a| a.thermal_output_wh)
            .sum()
    }
}

/// Cover `residual_wh` with the fleet in priority order.
///
/// Each plant serves `min(remaining, capacity)`; a plant whose share would
/// fall below its minimum part load stays off. Demand left above
/// `tolerance_wh` after the last plant is an [`CeaError::InsufficientCapacity`].
pub fn activate_sources(
    hour: usize,
    residual_wh: f64,
    fleet: &PlantFleet,
    conditions: &HourlyRecord,
    config: &DispatchConfig,
) -> CeaResult<HourlyDispatch> {
    if !residual_wh.is_finite() {
        return Err(CeaError::Simulation {
            hour,
            message: format!("residual demand is not finite ({residual_wh})"),
        });
    }

    let demand_wh = residual_wh.max(0.0);
    let mut remaining = demand_wh;
    let mut allocations = Vec::new();

    for plant in fleet.plants() {
        if remaining <= config.tolerance_wh {
            break;
        }
        // capacity over one hourly step
        let capacity_wh = plant.capacity_w;
        let served = remaining.min(capacity_wh);
        if served <= 0.0 || served < plant.min_part_load * capacity_wh {
            debug!(hour, plant = %plant.kind, served, "below minimum part load, skipped");
            continue;
        }
        allocations.push(plant.operate(served, conditions, config));
        remaining -= served;
    }

    if remaining > config.tolerance_wh {
        return Err(CeaError::InsufficientCapacity {
            hour,
            remaining_w: remaining,
        });
    }

    Ok(HourlyDispatch {
        hour,
        demand_wh,
        allocations,
    })
}

/// Annual totals of one technology.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KindTotals {
    pub kind: PlantKind,
    pub thermal_output_wh: f64,
    pub fuel_or_source_wh: f64,
    pub electricity_wh: f64,
    pub cost_chf: f64,
    pub primary_energy_wh: f64,
    pub co2_kg: f64,
    pub operating_hours: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DispatchSummary {
    pub hours: usize,
    pub demand_wh: f64,
    pub cost_chf: f64,
    pub primary_energy_wh: f64,
    pub co2_kg: f64,
    /// Per technology, in priority order
    pub by_kind: Vec<KindTotals>,
}

impl DispatchSummary {
    fn from_hours(hours: &[HourlyDispatch]) -> Self {
        let mut by_kind: BTreeMap<PlantKind, KindTotals> = BTreeMap::new();
        let mut summary = DispatchSummary {
            hours: hours.len(),
            ..DispatchSummary::default()
        };
        for hour in hours {
            summary.demand_wh += hour.demand_wh;
            for a in &hour.allocations {
                summary.cost_chf += a.marginal_cost_chf;
                summary.primary_energy_wh += a.primary_energy_wh;
                summary.co2_kg += a.co2_kg;

                let totals = by_kind.entry(a.kind).or_insert_with(|| KindTotals {
                    kind: a.kind,
                    ..KindTotals::default()
                });
                totals.thermal_output_wh += a.thermal_output_wh;
                totals.fuel_or_source_wh += a.fuel_or_source_wh;
                totals.electricity_wh += a.electricity_wh;
                totals.cost_chf += a.marginal_cost_chf;
                totals.primary_energy_wh += a.primary_energy_wh;
                totals.co2_kg += a.co2_kg;
                totals.operating_hours += 1;
            }
        }
        summary.by_kind = by_kind.into_values().collect();
        summary
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnualDispatch {
    pub hours: Vec<HourlyDispatch>,
    pub summary: DispatchSummary,
}

/// Apply [`activate_sources`] to every hour in order.
///
/// `residuals[i]` is covered under `conditions[i]`; both slices must have
/// the same length. The first hour without enough capacity aborts the run.
pub fn dispatch_year(
    residuals: &[f64],
    conditions: &[HourlyRecord],
    fleet: &PlantFleet,
    config: &DispatchConfig,
) -> CeaResult<AnnualDispatch> {
    config.validate()?;
    if residuals.len() != conditions.len() {
        return Err(CeaError::Validation(format!(
            "{} residual values for {} hourly records",
            residuals.len(),
            conditions.len()
        )));
    }

    let hours = residuals
        .iter()
        .zip(conditions)
        .map(|(&residual, record)| activate_sources(record.hour, residual, fleet, record, config))
        .collect::<CeaResult<Vec<_>>>()?;
    let summary = DispatchSummary::from_hours(&hours);

    info!(
        hours = summary.hours,
        demand_mwh = summary.demand_wh / 1e6,
        cost_chf = summary.cost_chf,
        co2_t = summary.co2_kg / 1_000.0,
        "plant dispatch complete"
    );

    Ok(AnnualDispatch { hours, summary })
}
