//! Load-flow oracle for candidate layouts
//!
//! The topology optimizer only needs a yes/no feasibility answer plus peak
//! losses and per-line loading for its sizing heuristics. Solvers implement
//! [`PowerFlowSolver`]; [`RadialSweepSolver`] is the default.
//!
//! An infeasible layout is a normal result ([`LoadFlowStatus::Infeasible`]),
//! never an error, so a bad individual cannot stall the worker pool.

use crate::topology::CandidateNetwork;
use cea_core::LineCatalog;
use serde::Serialize;

mod radial;

pub use radial::RadialSweepSolver;

/// Reason a layout failed the load flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Violation {
    /// Line current above its rating (`loading > 1`)
    OverloadedLine { edge: usize, loading: f64 },
    /// Voltage drop beyond the allowed fraction
    UnderVoltage { node: usize, voltage_v: f64 },
    /// Consumer with no path to a plant over active lines
    Unsupplied { node: usize },
    /// Active gene without a catalog entry
    UnknownLineType { edge: usize, gene: usize },
    /// Sweep produced NaN/inf or a collapsed voltage
    NonFinite,
    /// Voltages still moving after the iteration limit
    NotConverged { iterations: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LoadFlowStatus {
    Feasible,
    Infeasible(Vec<Violation>),
}

/// Per-edge and per-node results, indexed like the candidate network.
#[derive(Debug, Clone, Serialize)]
pub struct LoadFlowResult {
    pub status: LoadFlowStatus,
    pub edge_current_a: Vec<f64>,
    /// Current divided by the line rating, `0` for inactive edges
    pub edge_loading: Vec<f64>,
    pub edge_loss_kw: Vec<f64>,
    /// `0` for nodes outside the supplied forest
    pub node_voltage_v: Vec<f64>,
    pub power_loss_kw: f64,
    pub iterations: usize,
}

impl LoadFlowResult {
    pub fn is_feasible(&self) -> bool {
        matches!(self.status, LoadFlowStatus::Feasible)
    }

    /// Loss used for fitness: the solved loss, or `+inf` when infeasible.
    pub fn fitness_loss_kw(&self) -> f64 {
        if self.is_feasible() {
            self.power_loss_kw
        } else {
            f64::INFINITY
        }
    }

    pub fn violations(&self) -> &[Violation] {
        match &self.status {
            LoadFlowStatus::Feasible => &[],
            LoadFlowStatus::Infeasible(v) => v,
        }
    }
}

/// Load-flow oracle shared read-only by all evaluation workers.
pub trait PowerFlowSolver: Send + Sync {
    fn solve(
        &self,
        network: &CandidateNetwork,
        catalog: &LineCatalog,
        genes: &[usize],
    ) -> LoadFlowResult;
}
