//! One hourly transition of the storage state machine.
//!
//! ```text
//! solar > demand ──► Charge     surplus → tank (heat pump if T_tank > T_return)
//! solar ≤ demand ──► Discharge  deficit ← tank (heat pump if T_supply > T_tank)
//!                    Idle       tank empty, deficit is missing energy
//! then: content −= envelope loss at the start-of-hour temperature
//! ```
//!
//! Equal temperatures select the direct heat exchanger, so no COP is ever
//! computed from a zero temperature lift.

use super::tank::StorageTank;
use crate::config::StorageConfig;
use serde::Serialize;

/// Temperature lift below which a direct heat exchanger is used (K).
const MIN_LIFT_K: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    Charge,
    Discharge,
    Idle,
}

impl StorageMode {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageMode::Charge => "charge",
            StorageMode::Discharge => "discharge",
            StorageMode::Idle => "idle",
        }
    }
}

/// Inputs of one hour. Temperatures in K, energies in Wh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepInput {
    pub hour: usize,
    pub solar_available_wh: f64,
    pub network_demand_wh: f64,
    pub storage_temp_k: f64,
    pub storage_content_wh: f64,
    pub dh_supply_temp_k: f64,
    pub dh_return_temp_k: f64,
    pub ambient_temp_k: f64,
    pub mass_flow_kg_s: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageStepOutcome {
    pub hour: usize,
    pub mode: StorageMode,
    pub new_content_wh: f64,
    pub new_temp_k: f64,
    /// Deficit asked from the tank
    pub requested_from_storage_wh: f64,
    /// Surplus offered to the tank
    pub requested_to_storage_wh: f64,
    /// Energy added to the tank content
    pub energy_to_storage_wh: f64,
    /// Energy removed from the tank content
    pub energy_from_storage_wh: f64,
    /// Heat delivered to the network out of the tank (incl. heat pump lift)
    pub delivered_from_storage_wh: f64,
    pub aux_charge_wh: f64,
    pub aux_discharge_wh: f64,
    pub missing_wh: f64,
    /// Envelope loss actually taken from the content
    pub heat_loss_wh: f64,
    /// Surplus refused because the tank reached `t_max`
    pub rejected_wh: f64,
    pub adjusted_mass_flow_kg_s: f64,
    /// Content was clamped at zero or at the cap after losses
    pub clamped: bool,
}

/// Heat-pump COP for lifting heat from `cold_k` to `hot_k`, at least 1.
fn heat_pump_cop(efficiency: f64, hot_k: f64, cold_k: f64) -> f64 {
    (efficiency * hot_k / (hot_k - cold_k)).max(1.0)
}

pub fn storage_step(
    input: &StepInput,
    tank: &StorageTank,
    config: &StorageConfig,
) -> StorageStepOutcome {
    let lf = config.loss_factor;
    let content = input.storage_content_wh.max(0.0);
    let t_storage = input.storage_temp_k;
    let surplus = input.solar_available_wh - input.network_demand_wh;

    let mut out = StorageStepOutcome {
        hour: input.hour,
        mode: StorageMode::Idle,
        new_content_wh: content,
        new_temp_k: t_storage,
        requested_from_storage_wh: 0.0,
        requested_to_storage_wh: 0.0,
        energy_to_storage_wh: 0.0,
        energy_from_storage_wh: 0.0,
        delivered_from_storage_wh: 0.0,
        aux_charge_wh: 0.0,
        aux_discharge_wh: 0.0,
        missing_wh: 0.0,
        heat_loss_wh: 0.0,
        rejected_wh: 0.0,
        adjusted_mass_flow_kg_s: 0.0,
        clamped: false,
    };

    if surplus > 0.0 {
        out.mode = StorageMode::Charge;
        out.requested_to_storage_wh = surplus;

        let (mut aux, mut stored) = if t_storage - input.dh_return_temp_k > MIN_LIFT_K {
            let cop = heat_pump_cop(config.hp_exergy_efficiency, t_storage, input.dh_return_temp_k);
            let aux = surplus * (1.0 + lf) / cop;
            (aux, (aux + surplus) * (1.0 - lf))
        } else {
            (0.0, surplus * (1.0 - lf))
        };

        let headroom = (tank.max_content() - content).max(0.0);
        if stored > headroom {
            let accepted = if stored > 0.0 { headroom / stored } else { 0.0 };
            aux *= accepted;
            stored = headroom;
            out.rejected_wh = surplus * (1.0 - accepted);
        }
        out.aux_charge_wh = aux;
        out.energy_to_storage_wh = stored;
    } else {
        let deficit = -surplus;
        out.requested_from_storage_wh = deficit;

        if deficit > 0.0 && content > 0.0 {
            out.mode = StorageMode::Discharge;
            let (draw_factor, aux_factor) = if input.dh_supply_temp_k - t_storage > MIN_LIFT_K {
                let cop =
                    heat_pump_cop(config.hp_exergy_efficiency, input.dh_supply_temp_k, t_storage);
                ((1.0 - 1.0 / cop) * (1.0 + lf), (1.0 + lf) / cop)
            } else {
                (1.0 + lf, 0.0)
            };

            let mut delivered = deficit;
            let mut drawn = deficit * draw_factor;
            if drawn > content {
                // Re-run the same split on the request the content can carry
                delivered = content / draw_factor;
                drawn = (delivered * draw_factor).min(content);
            }
            out.delivered_from_storage_wh = delivered;
            out.energy_from_storage_wh = drawn;
            out.aux_discharge_wh = delivered * aux_factor;
            out.missing_wh = (deficit - delivered).max(0.0);
        } else {
            out.missing_wh = deficit.max(0.0);
        }
    }

    let after_transfer = content + out.energy_to_storage_wh - out.energy_from_storage_wh;
    let loss = tank.heat_loss_wh(t_storage, input.ambient_temp_k);
    let unclamped = after_transfer - loss;
    let new_content = unclamped.clamp(0.0, tank.max_content());
    out.clamped = new_content != unclamped;
    out.heat_loss_wh = after_transfer - new_content;
    out.new_content_wh = new_content;
    out.new_temp_k = tank.temperature_of(new_content);

    out.adjusted_mass_flow_kg_s = if input.network_demand_wh > 0.0 {
        input.mass_flow_kg_s * (input.network_demand_wh - out.missing_wh) / input.network_demand_wh
    } else {
        0.0
    };

    out
}
