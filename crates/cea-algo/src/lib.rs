//! # cea-algo: Network Planning and Storage Dispatch Algorithms
//!
//! This crate holds the numerical core of the district energy planner:
//!
//! ## Topology Optimization
//!
//! The [`topology`] module evolves candidate line layouts with a genetic
//! algorithm. Every individual is repaired until each consumer reaches a
//! plant, checked by a load-flow oracle ([`power_flow`]), tuned by line
//! sizing heuristics and scored by annuitized cost.
//!
//! | Stage | Function |
//! |-------|----------|
//! | Candidate universe | [`topology::initial_network`] |
//! | Random layout | [`topology::generate_individual`] |
//! | Connectivity repair | [`topology::process_individual_network`] |
//! | Per-individual worker | [`topology::evaluate_layout`] |
//! | Cost | [`topology::evaluate_individual`] |
//! | GA driver | [`topology::TopologyOptimizer`] |
//!
//! ## Storage Dispatch
//!
//! [`storage`] steps a seasonal thermal storage tank hour by hour
//! (charge / discharge / idle), reporting the energy still missing after
//! solar and storage.
//!
//! ## Plant Activation
//!
//! [`dispatch`] covers missing energy with a fixed merit order of heat
//! pumps, combined cycle and boilers, pricing each hour's allocation.
//!
//! ## Example
//!
//! ```ignore
//! use cea_algo::{config::CeaConfig, topology::TopologyOptimizer};
//!
//! let config = CeaConfig::default();
//! let candidates = cea_algo::topology::initial_network(&streets)?;
//! let outcome = TopologyOptimizer::new(&config)?.run(&candidates, &catalog)?;
//! println!("best cost: {:.0} CHF/yr", outcome.cost.total);
//! ```

pub mod config;
pub mod dispatch;
pub mod power_flow;
pub mod storage;
pub mod topology;

pub use config::{CeaConfig, DispatchConfig, GeneticConfig, PlanningConfig, StorageConfig};
pub use dispatch::{
    activate_sources, dispatch_year, AnnualDispatch, DispatchSummary, HourlyDispatch, Plant,
    PlantFleet, PlantKind,
};
pub use power_flow::{
    LoadFlowResult, LoadFlowStatus, PowerFlowSolver, RadialSweepSolver, Violation,
};
pub use storage::{simulate_storage, storage_step, StorageSimulation, StorageSummary, StorageTank};
pub use topology::{
    initial_network, CandidateNetwork, CostBreakdown, Individual, OptimizationOutcome,
    TopologyOptimizer,
};
