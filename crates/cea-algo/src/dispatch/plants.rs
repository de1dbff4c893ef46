use crate::config::DispatchConfig;
use cea_core::{CeaError, CeaResult, HourlyRecord};
use serde::{Deserialize, Serialize};

/// Generation technologies in activation priority order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PlantKind {
    SewageHeatPump,
    GroundSourceHeatPump,
    LakeHeatPump,
    CombinedCycle,
    BaseBoiler,
    #[default]
    PeakBoiler,
}

impl PlantKind {
    pub const ALL: [PlantKind; 6] = [
        PlantKind::SewageHeatPump,
        PlantKind::GroundSourceHeatPump,
        PlantKind::LakeHeatPump,
        PlantKind::CombinedCycle,
        PlantKind::BaseBoiler,
        PlantKind::PeakBoiler,
    ];

    pub fn is_heat_pump(self) -> bool {
        matches!(
            self,
            PlantKind::SewageHeatPump | PlantKind::GroundSourceHeatPump | PlantKind::LakeHeatPump
        )
    }

    /// Cold-side temperature of a heat pump for the given hour.
    pub fn source_temp_k(self, conditions: &HourlyRecord) -> Option<f64> {
        match self {
            PlantKind::SewageHeatPump => Some(conditions.sewage_temp_k),
            PlantKind::GroundSourceHeatPump => Some(conditions.ground_temp_k),
            PlantKind::LakeHeatPump => Some(conditions.lake_temp_k),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlantKind::SewageHeatPump => "sewage_heat_pump",
            PlantKind::GroundSourceHeatPump => "ground_source_heat_pump",
            PlantKind::LakeHeatPump => "lake_heat_pump",
            PlantKind::CombinedCycle => "combined_cycle",
            PlantKind::BaseBoiler => "base_boiler",
            PlantKind::PeakBoiler => "peak_boiler",
        }
    }
}

impl std::fmt::Display for PlantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlantKind {
    type Err = CeaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sewage_heat_pump" | "sewage_hp" => Ok(PlantKind::SewageHeatPump),
            "ground_source_heat_pump" | "gshp" => Ok(PlantKind::GroundSourceHeatPump),
            "lake_heat_pump" | "lake_hp" => Ok(PlantKind::LakeHeatPump),
            "combined_cycle" | "cc" | "furnace" => Ok(PlantKind::CombinedCycle),
            "base_boiler" | "boiler" => Ok(PlantKind::BaseBoiler),
            "peak_boiler" => Ok(PlantKind::PeakBoiler),
            other => Err(CeaError::Parse(format!("unknown plant kind '{other}'"))),
        }
    }
}

/// One installed plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub kind: PlantKind,
    /// Thermal capacity (W), i.e. Wh per hourly step
    pub capacity_w: f64,
    /// Fraction of capacity below which the plant is not started
    pub min_part_load: f64,
    /// Heat out per fuel in (combustion plants)
    pub thermal_efficiency: f64,
    /// Electricity out per fuel in (combined cycle only)
    pub electrical_efficiency: f64,
}

impl Plant {
    pub fn new(kind: PlantKind, capacity_w: f64) -> Self {
        Self {
            kind,
            capacity_w,
            min_part_load: 0.0,
            thermal_efficiency: 1.0,
            electrical_efficiency: 0.0,
        }
    }

    pub fn with_min_part_load(mut self, fraction: f64) -> Self {
        self.min_part_load = fraction;
        self
    }

    pub fn with_efficiencies(mut self, thermal: f64, electrical: f64) -> Self {
        self.thermal_efficiency = thermal;
        self.electrical_efficiency = electrical;
        self
    }

    pub fn validate(&self) -> CeaResult<()> {
        let name = self.kind.as_str();
        if !self.capacity_w.is_finite() || self.capacity_w < 0.0 {
            return Err(CeaError::Validation(format!("{name}: capacity must be non-negative")));
        }
        if !(0.0..=1.0).contains(&self.min_part_load) {
            return Err(CeaError::Validation(format!("{name}: min_part_load must lie in [0, 1]")));
        }
        if !self.kind.is_heat_pump() && !(self.thermal_efficiency > 0.0) {
            return Err(CeaError::Validation(format!(
                "{name}: thermal efficiency must be positive"
            )));
        }
        if self.electrical_efficiency < 0.0 {
            return Err(CeaError::Validation(format!(
                "{name}: electrical efficiency must be non-negative"
            )));
        }
        Ok(())
    }

    /// Run the plant to deliver `thermal_wh` in the given hour.
    pub fn operate(
        &self,
        thermal_wh: f64,
        conditions: &HourlyRecord,
        config: &DispatchConfig,
    ) -> PlantDispatch {
        let mut record = PlantDispatch {
            kind: self.kind,
            thermal_output_wh: thermal_wh,
            ..PlantDispatch::default()
        };

        match self.kind {
            kind if kind.is_heat_pump() => {
                let source = kind.source_temp_k(conditions).unwrap_or(conditions.ground_temp_k);
                let cop = network_heat_pump_cop(config, conditions.dh_supply_temp_k, source);
                let electricity = thermal_wh / cop;
                record.cop = Some(cop);
                record.electricity_wh = electricity;
                record.fuel_or_source_wh = thermal_wh - electricity;
            }
            PlantKind::CombinedCycle => {
                let fuel = thermal_wh / self.thermal_efficiency;
                record.fuel_or_source_wh = fuel;
                // Net export
                record.electricity_wh = -fuel * self.electrical_efficiency;
            }
            _ => {
                record.fuel_or_source_wh = thermal_wh / self.thermal_efficiency;
                record.electricity_wh = thermal_wh * config.boiler_aux_electricity_fraction;
            }
        }

        let fuel_kwh = if self.kind.is_heat_pump() {
            0.0
        } else {
            record.fuel_or_source_wh / 1_000.0
        };
        let bought_kwh = record.electricity_wh.max(0.0) / 1_000.0;

        record.marginal_cost_chf = fuel_kwh * config.gas_price_chf_per_kwh
            + bought_kwh * config.electricity_price_chf_per_kwh;
        record.primary_energy_wh = (fuel_kwh * config.gas_pen_factor
            + bought_kwh * config.electricity_pen_factor)
            * 1_000.0;
        record.co2_kg =
            fuel_kwh * config.gas_co2_kg_per_kwh + bought_kwh * config.electricity_co2_kg_per_kwh;
        record
    }
}

/// COP = η · T_supply / (T_supply − T_source), clamped to `[1, max_cop]`.
///
/// A zero or negative lift returns `max_cop`.
pub fn network_heat_pump_cop(config: &DispatchConfig, supply_k: f64, source_k: f64) -> f64 {
    let lift = supply_k - source_k;
    if lift <= 1e-6 {
        return config.max_cop;
    }
    (config.hp_exergy_efficiency * supply_k / lift).clamp(1.0, config.max_cop)
}

/// Output of one plant in one hour. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PlantDispatch {
    pub kind: PlantKind,
    pub thermal_output_wh: f64,
    /// Fuel burnt, or heat taken from the heat-pump source
    pub fuel_or_source_wh: f64,
    /// Auxiliary electricity; negative for net production
    pub electricity_wh: f64,
    pub cop: Option<f64>,
    pub marginal_cost_chf: f64,
    pub primary_energy_wh: f64,
    pub co2_kg: f64,
}

/// Installed plants in activation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantFleet {
    plants: Vec<Plant>,
}

impl PlantFleet {
    /// Validate plants and sort them by priority (stable within a kind).
    pub fn new(mut plants: Vec<Plant>) -> CeaResult<Self> {
        if plants.is_empty() {
            return Err(CeaError::Validation("plant fleet is empty".into()));
        }
        for plant in &plants {
            plant.validate()?;
        }
        plants.sort_by_key(|p| p.kind);
        Ok(Self { plants })
    }

    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    pub fn total_capacity_w(&self) -> f64 {
        self.plants.iter().map(|p| p.capacity_w).sum()
    }
}
