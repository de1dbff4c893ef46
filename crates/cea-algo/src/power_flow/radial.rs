//! Backward/forward sweep for radial low-voltage networks.
//!
//! ```text
//! 1. BFS from all plants over active lines  → spanning forest (parent, order)
//! 2. repeat until max |ΔV| < tolerance:
//!      backward: I_line(v) = P_v / V_v + Σ I_line(children)
//!      forward:  V_v = V_parent − I_line(v) · 2R_line
//! 3. losses = Σ I² · 2R
//! ```
//!
//! A sweep that hits `max_iterations` first is reported as not converged.
//! Plants are held at nominal voltage. Active lines that close a loop are
//! not part of the forest and carry no current.

use super::{LoadFlowResult, LoadFlowStatus, PowerFlowSolver, Violation};
use crate::config::PlanningConfig;
use crate::topology::CandidateNetwork;
use cea_core::LineCatalog;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct RadialSweepSolver {
    pub nominal_voltage_v: f64,
    /// Allowed relative voltage drop at any supplied node
    pub max_voltage_drop: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for RadialSweepSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl RadialSweepSolver {
    pub fn new() -> Self {
        Self {
            nominal_voltage_v: 400.0,
            max_voltage_drop: 0.1,
            tolerance: 1e-6,
            max_iterations: 50,
        }
    }

    pub fn from_config(config: &PlanningConfig) -> Self {
        Self::new()
            .with_nominal_voltage(config.nominal_voltage_v)
            .with_max_voltage_drop(config.max_voltage_drop)
    }

    pub fn with_nominal_voltage(mut self, volts: f64) -> Self {
        self.nominal_voltage_v = volts;
        self
    }

    pub fn with_max_voltage_drop(mut self, fraction: f64) -> Self {
        self.max_voltage_drop = fraction;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_max_iterations(mut self, max_iter: usize) -> Self {
        self.max_iterations = max_iter;
        self
    }
}

/// Spanning forest rooted at the plants.
struct Forest {
    /// `(parent node, edge id)` for every non-root supplied node
    parent: Vec<Option<(usize, usize)>>,
    /// Supplied nodes in BFS order (roots first)
    order: Vec<usize>,
    supplied: Vec<bool>,
}

fn spanning_forest(network: &CandidateNetwork, genes: &[usize]) -> Forest {
    let n = network.node_count();
    let mut adjacency: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
    for edge in network.active_edges(genes) {
        adjacency[edge.a].push((edge.b, edge.id.value()));
        adjacency[edge.b].push((edge.a, edge.id.value()));
    }

    let mut parent = vec![None; n];
    let mut supplied = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut queue = VecDeque::new();
    for plant in network.plants() {
        supplied[plant] = true;
        queue.push_back(plant);
    }
    while let Some(node) = queue.pop_front() {
        order.push(node);
        for &(next, edge) in &adjacency[node] {
            if !supplied[next] {
                supplied[next] = true;
                parent[next] = Some((node, edge));
                queue.push_back(next);
            }
        }
    }

    Forest {
        parent,
        order,
        supplied,
    }
}

impl PowerFlowSolver for RadialSweepSolver {
    fn solve(
        &self,
        network: &CandidateNetwork,
        catalog: &LineCatalog,
        genes: &[usize],
    ) -> LoadFlowResult {
        let n = network.node_count();
        let m = network.edge_count();
        let mut violations = Vec::new();

        // Loop resistance (both conductors) per edge
        let mut loop_resistance = vec![0.0; m];
        let mut rating = vec![0.0; m];
        for edge in network.active_edges(genes) {
            let id = edge.id.value();
            match catalog.get(genes[id]) {
                Some(line) => {
                    loop_resistance[id] = 2.0 * line.resistance_ohm(edge.length.value());
                    rating[id] = line.current_rating.value();
                }
                None => violations.push(Violation::UnknownLineType {
                    edge: id,
                    gene: genes[id],
                }),
            }
        }

        let forest = spanning_forest(network, genes);
        for consumer in network.consumers() {
            if !forest.supplied[consumer] {
                violations.push(Violation::Unsupplied { node: consumer });
            }
        }

        let u_n = self.nominal_voltage_v;
        let load_w: Vec<f64> = network
            .nodes
            .iter()
            .map(|node| node.peak_demand.to_watts())
            .collect();
        let mut voltage: Vec<f64> = forest
            .supplied
            .iter()
            .map(|&s| if s { u_n } else { 0.0 })
            .collect();
        let mut branch_current = vec![0.0; n];
        let mut iterations = 0;
        let mut collapsed = false;
        let mut converged = false;

        for iter in 0..self.max_iterations {
            iterations = iter + 1;

            branch_current.iter_mut().for_each(|i| *i = 0.0);
            for &node in forest.order.iter().rev() {
                let injected = if voltage[node] > 0.0 {
                    load_w[node] / voltage[node]
                } else {
                    f64::INFINITY
                };
                branch_current[node] += injected;
                if let Some((up, _)) = forest.parent[node] {
                    let flow = branch_current[node];
                    branch_current[up] += flow;
                }
            }

            let mut max_change: f64 = 0.0;
            for &node in &forest.order {
                let Some((up, edge)) = forest.parent[node] else {
                    continue;
                };
                let updated = voltage[up] - branch_current[node] * loop_resistance[edge];
                max_change = max_change.max((updated - voltage[node]).abs());
                voltage[node] = updated;
            }

            if voltage.iter().any(|v| !v.is_finite() || *v < 0.0) {
                collapsed = true;
                break;
            }
            if max_change < self.tolerance {
                converged = true;
                break;
            }
        }

        let mut edge_current_a = vec![0.0; m];
        let mut edge_loading = vec![0.0; m];
        let mut edge_loss_kw = vec![0.0; m];
        for &node in &forest.order {
            if let Some((_, edge)) = forest.parent[node] {
                let current = branch_current[node];
                edge_current_a[edge] = current;
                edge_loss_kw[edge] = current * current * loop_resistance[edge] / 1_000.0;
                if rating[edge] > 0.0 {
                    edge_loading[edge] = current / rating[edge];
                }
            }
        }
        let power_loss_kw: f64 = edge_loss_kw.iter().sum();

        if collapsed || !power_loss_kw.is_finite() {
            violations.push(Violation::NonFinite);
        } else {
            if !converged {
                violations.push(Violation::NotConverged { iterations });
            }
            for (edge, &loading) in edge_loading.iter().enumerate() {
                if loading > 1.0 {
                    violations.push(Violation::OverloadedLine { edge, loading });
                }
            }
            let min_voltage = u_n * (1.0 - self.max_voltage_drop);
            for &node in &forest.order {
                if voltage[node] < min_voltage {
                    violations.push(Violation::UnderVoltage {
                        node,
                        voltage_v: voltage[node],
                    });
                }
            }
        }

        let status = if violations.is_empty() {
            LoadFlowStatus::Feasible
        } else {
            LoadFlowStatus::Infeasible(violations)
        };

        LoadFlowResult {
            status,
            edge_current_a,
            edge_loading,
            edge_loss_kw,
            node_voltage_v: voltage,
            power_loss_kw,
            iterations,
        }
    }
}
