//! Run configuration passed explicitly into every component.
//!
//! Each section deserializes from TOML with `#[serde(default)]`, so a config
//! file only needs the values it overrides:
//!
//! ```toml
//! [planning]
//! interest_rate = 0.06
//!
//! [genetic]
//! population_size = 40
//! seed = 7
//! ```

use cea_core::{CeaError, CeaResult};
use serde::{Deserialize, Serialize};

/// Grouped configuration for a full planning/dispatch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CeaConfig {
    pub planning: PlanningConfig,
    pub genetic: GeneticConfig,
    pub storage: StorageConfig,
    pub dispatch: DispatchConfig,
}

impl CeaConfig {
    pub fn validate(&self) -> CeaResult<()> {
        self.planning.validate()?;
        self.genetic.validate()?;
        self.storage.validate()?;
        self.dispatch.validate()
    }
}

/// Cost and heuristic parameters of the topology optimizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// Interest rate for annuitizing line investments
    pub interest_rate: f64,
    /// Equivalent full-load hours used to price peak power losses (h/yr)
    pub loss_hours: f64,
    /// Price of lost electricity (CHF/kWh)
    pub electricity_price_chf_per_kwh: f64,
    /// Probability of accepting each candidate edge (shortest first) when merging subnets
    pub line_probability: f64,
    /// Gene value installed on edges added by the repair step
    pub repair_line_type: usize,
    /// Loading above which a line is reinforced by one catalog size
    pub overload_threshold: f64,
    /// Loading below which a line is downsized by one catalog size
    pub underload_threshold: f64,
    /// Loading at or below which a line counts as unused
    pub zero_load_tolerance: f64,
    /// Loading below which a line may be dropped by the soft delete pass
    pub soft_delete_threshold: f64,
    /// Probability of dropping a lightly loaded line in the soft delete pass
    pub soft_delete_probability: f64,
    /// Nominal voltage at plant nodes (V)
    pub nominal_voltage_v: f64,
    /// Allowed relative voltage drop at any supplied node
    pub max_voltage_drop: f64,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            interest_rate: 0.05,
            loss_hours: 2_000.0,
            electricity_price_chf_per_kwh: 0.23,
            line_probability: 0.7,
            repair_line_type: 1,
            overload_threshold: 0.9,
            underload_threshold: 0.5,
            zero_load_tolerance: 1e-6,
            soft_delete_threshold: 0.05,
            soft_delete_probability: 0.5,
            nominal_voltage_v: 400.0,
            max_voltage_drop: 0.1,
        }
    }
}

impl PlanningConfig {
    pub fn validate(&self) -> CeaResult<()> {
        check_non_negative("planning.interest_rate", self.interest_rate)?;
        check_non_negative("planning.loss_hours", self.loss_hours)?;
        check_non_negative(
            "planning.electricity_price_chf_per_kwh",
            self.electricity_price_chf_per_kwh,
        )?;
        check_probability("planning.line_probability", self.line_probability)?;
        check_probability(
            "planning.soft_delete_probability",
            self.soft_delete_probability,
        )?;
        if self.repair_line_type == 0 {
            return Err(CeaError::Config(
                "planning.repair_line_type must be a catalog index (>= 1)".into(),
            ));
        }
        if !(self.underload_threshold < self.overload_threshold) {
            return Err(CeaError::Config(
                "planning.underload_threshold must be below overload_threshold".into(),
            ));
        }
        if self.nominal_voltage_v <= 0.0 {
            return Err(CeaError::Config(
                "planning.nominal_voltage_v must be positive".into(),
            ));
        }
        check_probability("planning.max_voltage_drop", self.max_voltage_drop)
    }
}

/// Genetic-algorithm parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Probability that a pair of offspring undergoes uniform crossover
    pub crossover_probability: f64,
    /// Probability that an offspring undergoes mutation
    pub mutation_probability: f64,
    /// Per-gene probability used by both crossover swaps and mutation
    pub gene_probability: f64,
    pub tournament_size: usize,
    /// Share of the population kept in the hall of fame (rounded up)
    pub elite_fraction: f64,
    pub seed: u64,
    /// Worker threads; `0` uses one per CPU core
    pub threads: usize,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            generations: 10,
            crossover_probability: 0.5,
            mutation_probability: 0.2,
            gene_probability: 0.05,
            tournament_size: 3,
            elite_fraction: 0.1,
            seed: 42,
            threads: 0,
        }
    }
}

impl GeneticConfig {
    pub fn validate(&self) -> CeaResult<()> {
        if self.population_size < 2 {
            return Err(CeaError::Config(
                "genetic.population_size must be at least 2".into(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(CeaError::Config(
                "genetic.tournament_size must be at least 1".into(),
            ));
        }
        check_probability("genetic.crossover_probability", self.crossover_probability)?;
        check_probability("genetic.mutation_probability", self.mutation_probability)?;
        check_probability("genetic.gene_probability", self.gene_probability)?;
        check_probability("genetic.elite_fraction", self.elite_fraction)
    }

    /// Hall-of-fame size: ⌈elite_fraction · P⌉, at least one and below P.
    pub fn elite_size(&self) -> usize {
        let size = (self.elite_fraction * self.population_size as f64).ceil() as usize;
        size.clamp(1, self.population_size.saturating_sub(1).max(1))
    }
}

/// Thermal storage tank and charging equipment parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Exergy efficiency of the charge/discharge heat pump
    pub hp_exergy_efficiency: f64,
    /// Fractional loss of the charge/discharge heat exchange
    pub loss_factor: f64,
    /// Lower design temperature (K); content is measured from here
    pub t_min_k: f64,
    /// Upper design temperature (K)
    pub t_max_k: f64,
    /// Temperature at the start of a run (K)
    pub initial_temp_k: f64,
    /// Specific heat of the storage fluid (J/kgK)
    pub cp_j_per_kg_k: f64,
    pub density_kg_per_m3: f64,
    /// Heat transfer coefficient of the tank envelope (W/m²K)
    pub alpha_loss_w_per_m2_k: f64,
    /// Ground temperature seen by the tank side wall (K)
    pub ground_temp_k: f64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            hp_exergy_efficiency: 0.6,
            loss_factor: 0.05,
            t_min_k: 283.15,
            t_max_k: 363.15,
            initial_temp_k: 303.15,
            cp_j_per_kg_k: 4_185.0,
            density_kg_per_m3: 1_000.0,
            alpha_loss_w_per_m2_k: 0.0111,
            ground_temp_k: 283.15,
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> CeaResult<()> {
        check_probability("storage.hp_exergy_efficiency", self.hp_exergy_efficiency)?;
        if self.hp_exergy_efficiency == 0.0 {
            return Err(CeaError::Config(
                "storage.hp_exergy_efficiency must be positive".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.loss_factor) {
            return Err(CeaError::Config(
                "storage.loss_factor must lie in [0, 1)".into(),
            ));
        }
        if !(self.t_min_k > 0.0 && self.t_min_k < self.t_max_k) {
            return Err(CeaError::Config(
                "storage temperatures must satisfy 0 < t_min_k < t_max_k".into(),
            ));
        }
        if !(self.t_min_k..=self.t_max_k).contains(&self.initial_temp_k) {
            return Err(CeaError::Config(
                "storage.initial_temp_k must lie within [t_min_k, t_max_k]".into(),
            ));
        }
        if self.cp_j_per_kg_k <= 0.0 || self.density_kg_per_m3 <= 0.0 {
            return Err(CeaError::Config(
                "storage fluid properties must be positive".into(),
            ));
        }
        check_non_negative("storage.alpha_loss_w_per_m2_k", self.alpha_loss_w_per_m2_k)
    }
}

/// Prices, carrier factors and technology constants for plant activation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub electricity_price_chf_per_kwh: f64,
    pub gas_price_chf_per_kwh: f64,
    /// Non-renewable primary energy per unit of final energy
    pub electricity_pen_factor: f64,
    pub gas_pen_factor: f64,
    /// Emissions (kg CO2 per kWh of final energy)
    pub electricity_co2_kg_per_kwh: f64,
    pub gas_co2_kg_per_kwh: f64,
    /// Exergy efficiency of the network heat pumps
    pub hp_exergy_efficiency: f64,
    /// Upper bound on any heat-pump COP (also used for zero temperature lift)
    pub max_cop: f64,
    /// Pumping/fan electricity of boilers per unit of heat
    pub boiler_aux_electricity_fraction: f64,
    /// Remaining demand below this value counts as served (Wh)
    pub tolerance_wh: f64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            electricity_price_chf_per_kwh: 0.23,
            gas_price_chf_per_kwh: 0.09,
            electricity_pen_factor: 2.69,
            gas_pen_factor: 1.12,
            electricity_co2_kg_per_kwh: 0.0385,
            gas_co2_kg_per_kwh: 0.228,
            hp_exergy_efficiency: 0.6,
            max_cop: 10.0,
            boiler_aux_electricity_fraction: 0.01,
            tolerance_wh: 1e-3,
        }
    }
}

impl DispatchConfig {
    pub fn validate(&self) -> CeaResult<()> {
        check_non_negative(
            "dispatch.electricity_price_chf_per_kwh",
            self.electricity_price_chf_per_kwh,
        )?;
        check_non_negative("dispatch.gas_price_chf_per_kwh", self.gas_price_chf_per_kwh)?;
        check_probability("dispatch.hp_exergy_efficiency", self.hp_exergy_efficiency)?;
        if self.max_cop < 1.0 {
            return Err(CeaError::Config("dispatch.max_cop must be >= 1".into()));
        }
        check_non_negative(
            "dispatch.boiler_aux_electricity_fraction",
            self.boiler_aux_electricity_fraction,
        )?;
        check_non_negative("dispatch.tolerance_wh", self.tolerance_wh)
    }
}

fn check_probability(name: &str, value: f64) -> CeaResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CeaError::Config(format!("{name} must lie in [0, 1], got {value}")))
    }
}

fn check_non_negative(name: &str, value: f64) -> CeaResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CeaError::Config(format!("{name} must be a non-negative number, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        CeaConfig::default().validate().unwrap();
    }

    #[test]
    fn elite_size_rounds_up() {
        let genetic = GeneticConfig {
            population_size: 15,
            ..GeneticConfig::default()
        };
        assert_eq!(genetic.elite_size(), 2);

        let tiny = GeneticConfig {
            population_size: 2,
            ..GeneticConfig::default()
        };
        assert_eq!(tiny.elite_size(), 1);
    }

    #[test]
    fn rejects_bad_probability() {
        let planning = PlanningConfig {
            line_probability: 1.5,
            ..PlanningConfig::default()
        };
        assert!(planning.validate().is_err());
    }

    #[test]
    fn rejects_inverted_storage_bounds() {
        let storage = StorageConfig {
            t_min_k: 350.0,
            t_max_k: 300.0,
            ..StorageConfig::default()
        };
        assert!(storage.validate().is_err());
    }
}
