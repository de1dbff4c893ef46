//! Network Topology Optimization
//!
//! Searches the space of line layouts over a complete candidate graph for
//! the lowest annuitized cost (investment + O&M + losses), subject to every
//! consumer being connected to a plant without overloaded lines or buses.
//!
//! ## Layout Encoding
//!
//! A layout is a gene vector with one entry per [`CandidateEdge`]:
//! `0` = no line, `k` = catalog line type `k`. Random variation freely
//! produces disconnected layouts, so every evaluation starts with
//! [`process_individual_network`], which merges plantless subnets until the
//! connectivity invariant holds.
//!
//! ## Modules
//!
//! - `problem`: candidate universe from the street graph ([`initial_network`])
//! - `individual`: layout value type and random generation
//! - `fitness`: annuity factor and cost breakdown
//! - `repair`: union-find subnet detection and merging
//! - `heuristics`: delete / reinforce / downsize passes driven by line loading
//! - `worker`: the per-individual repair → solve → tune → repair → solve chain
//! - `genetic`: population loop on a rayon pool

mod fitness;
mod genetic;
mod heuristics;
mod individual;
mod problem;
mod repair;
mod worker;

#[cfg(test)]
pub(crate) mod test_support;

pub use fitness::{annuity_factor, evaluate_individual, CostBreakdown};
pub use genetic::{
    mutate_uniform, tournament_selection, uniform_crossover, GenerationStats,
    OptimizationOutcome, TopologyOptimizer,
};
pub use heuristics::{delete_line_hard, delete_line_soft, downsize_lines, reinforce_lines};
pub use individual::{generate_individual, Individual};
pub use problem::{initial_network, CandidateEdge, CandidateId, CandidateNetwork};
pub use repair::{is_fully_supplied, process_individual_network, subnets, Subnet, SubnetKind};
pub use worker::{evaluate_layout, EvaluationContext, LayoutEvaluation};
