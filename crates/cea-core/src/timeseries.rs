//! Hourly demand / solar / temperature records.
//!
//! One record per hour of the simulated year. Energies are per hourly step
//! (Wh), temperatures are absolute (K); importers convert from the °C found
//! in input files.

use crate::error::{CeaError, CeaResult};
use serde::{Deserialize, Serialize};

/// Standard simulation horizon (hours per non-leap year)
pub const HOURS_PER_YEAR: usize = 8_760;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    pub hour: usize,
    /// Thermal demand of the network (Wh)
    pub network_demand_wh: f64,
    /// Solar thermal energy available (Wh)
    pub solar_available_wh: f64,
    pub dh_supply_temp_k: f64,
    pub dh_return_temp_k: f64,
    pub ambient_temp_k: f64,
    /// Network mass flow requested for this hour (kg/s)
    pub mass_flow_kg_s: f64,
    /// Heat-pump source temperatures for plant activation (K)
    pub sewage_temp_k: f64,
    pub ground_temp_k: f64,
    pub lake_temp_k: f64,
}

impl HourlyRecord {
    /// Reject non-finite or physically impossible inputs.
    pub fn validate(&self) -> CeaResult<()> {
        let energies = [
            ("network_demand_wh", self.network_demand_wh),
            ("solar_available_wh", self.solar_available_wh),
            ("mass_flow_kg_s", self.mass_flow_kg_s),
        ];
        for (name, value) in energies {
            if !value.is_finite() || value < 0.0 {
                return Err(CeaError::Simulation {
                    hour: self.hour,
                    message: format!("{name} must be a non-negative number, got {value}"),
                });
            }
        }
        let temperatures = [
            ("dh_supply_temp_k", self.dh_supply_temp_k),
            ("dh_return_temp_k", self.dh_return_temp_k),
            ("ambient_temp_k", self.ambient_temp_k),
            ("sewage_temp_k", self.sewage_temp_k),
            ("ground_temp_k", self.ground_temp_k),
            ("lake_temp_k", self.lake_temp_k),
        ];
        for (name, value) in temperatures {
            if !value.is_finite() || value <= 0.0 {
                return Err(CeaError::Simulation {
                    hour: self.hour,
                    message: format!("{name} must be a positive absolute temperature, got {value}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> HourlyRecord {
        HourlyRecord {
            hour: 5,
            network_demand_wh: 1_000.0,
            solar_available_wh: 0.0,
            dh_supply_temp_k: 343.15,
            dh_return_temp_k: 313.15,
            ambient_temp_k: 278.15,
            mass_flow_kg_s: 0.1,
            sewage_temp_k: 288.15,
            ground_temp_k: 283.15,
            lake_temp_k: 279.15,
        }
    }

    #[test]
    fn valid_record_passes() {
        record().validate().unwrap();
    }

    #[test]
    fn nan_demand_reports_hour() {
        let mut r = record();
        r.network_demand_wh = f64::NAN;
        let err = r.validate().unwrap_err();
        assert!(err.to_string().contains("hour 5"));
    }

    #[test]
    fn celsius_temperature_is_rejected() {
        let mut r = record();
        r.ambient_temp_k = -3.0;
        assert!(r.validate().is_err());
    }
}
