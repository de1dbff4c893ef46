//! Seasonal thermal storage dispatch
//!
//! An hour-by-hour state machine deciding how much solar surplus goes into
//! a storage tank and how much of the network deficit the tank covers.
//! Charging and discharging use a heat pump whenever the tank temperature is
//! on the wrong side of the network return/supply temperature, otherwise a
//! direct heat exchanger. Whatever solar and storage cannot cover is
//! *missing energy*, handed to plant activation.
//!
//! The loop is strictly sequential: every hour starts from the previous
//! hour's content and temperature. Independent runs (e.g. different tank
//! volumes) can execute in parallel, see the `cea-batch` crate.

mod simulation;
mod step;
mod tank;

pub use simulation::{simulate_storage, StorageSimulation, StorageSummary};
pub use step::{storage_step, StepInput, StorageMode, StorageStepOutcome};
pub use tank::StorageTank;
