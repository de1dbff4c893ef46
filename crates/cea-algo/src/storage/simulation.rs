use super::step::{storage_step, StepInput, StorageMode, StorageStepOutcome};
use super::tank::StorageTank;
use crate::config::StorageConfig;
use cea_core::{CeaResult, HourlyRecord};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Annual totals of a storage run (Wh unless noted).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSummary {
    pub hours: usize,
    pub charge_hours: usize,
    pub discharge_hours: usize,
    pub idle_hours: usize,
    pub charged_wh: f64,
    pub discharged_wh: f64,
    pub delivered_wh: f64,
    pub aux_charge_wh: f64,
    pub aux_discharge_wh: f64,
    pub heat_loss_wh: f64,
    pub missing_wh: f64,
    pub rejected_wh: f64,
    /// Hours with missing energy above zero
    pub unmet_hours: usize,
    pub final_content_wh: f64,
    pub final_temp_k: f64,
    pub min_temp_k: f64,
    pub max_temp_k: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StorageSimulation {
    pub steps: Vec<StorageStepOutcome>,
    pub summary: StorageSummary,
}

impl StorageSimulation {
    /// Missing energy per hour, the input of plant activation.
    pub fn residual_demand(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.missing_wh).collect()
    }
}

/// Run the storage state machine over a series in chronological order.
///
/// The tank starts at `config.initial_temp_k`. Each record is validated
/// first; a bad hour aborts the run with its hour index.
pub fn simulate_storage(
    series: &[HourlyRecord],
    tank: &StorageTank,
    config: &StorageConfig,
) -> CeaResult<StorageSimulation> {
    config.validate()?;

    let mut temp_k = config.initial_temp_k;
    let mut content_wh = tank.content_at(temp_k);
    let mut steps = Vec::with_capacity(series.len());
    let mut summary = StorageSummary {
        min_temp_k: temp_k,
        max_temp_k: temp_k,
        ..StorageSummary::default()
    };
    let mut clamp_warned = false;

    for (position, record) in series.iter().enumerate() {
        record.validate().map_err(|e| e.at_hour(record.hour))?;

        let outcome = storage_step(
            &StepInput {
                hour: record.hour,
                solar_available_wh: record.solar_available_wh,
                network_demand_wh: record.network_demand_wh,
                storage_temp_k: temp_k,
                storage_content_wh: content_wh,
                dh_supply_temp_k: record.dh_supply_temp_k,
                dh_return_temp_k: record.dh_return_temp_k,
                ambient_temp_k: record.ambient_temp_k,
                mass_flow_kg_s: record.mass_flow_kg_s,
            },
            tank,
            config,
        );

        if outcome.clamped && !clamp_warned {
            warn!(
                hour = record.hour,
                position,
                "storage content clamped to its bounds after heat loss"
            );
            clamp_warned = true;
        }

        temp_k = outcome.new_temp_k;
        content_wh = outcome.new_content_wh;
        accumulate(&mut summary, &outcome);
        steps.push(outcome);
    }

    summary.hours = steps.len();
    summary.final_content_wh = content_wh;
    summary.final_temp_k = temp_k;

    info!(
        hours = summary.hours,
        volume_m3 = tank.volume_m3,
        missing_kwh = summary.missing_wh / 1_000.0,
        rejected_kwh = summary.rejected_wh / 1_000.0,
        final_temp_k = summary.final_temp_k,
        "storage simulation complete"
    );

    Ok(StorageSimulation { steps, summary })
}

fn accumulate(summary: &mut StorageSummary, step: &StorageStepOutcome) {
    match step.mode {
        StorageMode::Charge => summary.charge_hours += 1,
        StorageMode::Discharge => summary.discharge_hours += 1,
        StorageMode::Idle => summary.idle_hours += 1,
    }
    summary.charged_wh += step.energy_to_storage_wh;
    summary.discharged_wh += step.energy_from_storage_wh;
    summary.delivered_wh += step.delivered_from_storage_wh;
    summary.aux_charge_wh += step.aux_charge_wh;
    summary.aux_discharge_wh += step.aux_discharge_wh;
    summary.heat_loss_wh += step.heat_loss_wh;
    summary.missing_wh += step.missing_wh;
    summary.rejected_wh += step.rejected_wh;
    if step.missing_wh > 0.0 {
        summary.unmet_hours += 1;
    }
    summary.min_temp_k = summary.min_temp_k.min(step.new_temp_k);
    summary.max_temp_k = summary.max_temp_k.max(step.new_temp_k);
}
