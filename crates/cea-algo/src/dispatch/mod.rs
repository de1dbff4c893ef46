//! Plant activation
//!
//! Covers the hourly residual (missing) energy left after solar and storage
//! with a fixed merit order:
//!
//! ```text
//! sewage HP → ground-source HP → lake HP → combined cycle → base boiler → peak boiler
//! ```
//!
//! Heat pumps are priced by their electricity, combustion plants by fuel.
//! Every record carries primary energy and CO2 from per-carrier factors.
//! Demand left over after the last plant is a configuration error and
//! aborts the run with the failing hour.

mod plants;
mod sequencer;

pub use plants::{network_heat_pump_cop, Plant, PlantDispatch, PlantFleet, PlantKind};
pub use sequencer::{
    activate_sources, dispatch_year, AnnualDispatch, DispatchSummary, HourlyDispatch, KindTotals,
};
