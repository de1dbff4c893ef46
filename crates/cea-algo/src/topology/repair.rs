//! Connectivity repair.
//!
//! Random initialization, crossover and mutation routinely leave consumers
//! cut off from every plant. Repair merges plantless subnets into their
//! neighbours, one candidate edge at a time, until every subnet holds a
//! plant. Components come from a union-find over the arena indices.

use super::individual::Individual;
use super::problem::{CandidateEdge, CandidateNetwork};
use crate::config::PlanningConfig;
use cea_core::{component_labels, group_components, LineCatalog};
use rand::Rng;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubnetKind {
    /// Holds at least one plant
    Supplied,
    /// Holds consumers but no plant
    ConsumersOnly,
}

/// Connected component of the graph induced by a layout's active edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subnet {
    pub label: usize,
    /// Arena indices in ascending order
    pub nodes: Vec<usize>,
    pub kind: SubnetKind,
}

fn component_map(genes: &[usize], network: &CandidateNetwork) -> Vec<usize> {
    component_labels(
        network.node_count(),
        network.active_edges(genes).map(|e| (e.a, e.b)),
    )
}

/// Split a layout into subnets.
pub fn subnets(genes: &[usize], network: &CandidateNetwork) -> Vec<Subnet> {
    let labels = component_map(genes, network);
    group_components(&labels)
        .into_iter()
        .enumerate()
        .map(|(label, nodes)| {
            let kind = if nodes.iter().any(|&n| network.is_plant(n)) {
                SubnetKind::Supplied
            } else {
                SubnetKind::ConsumersOnly
            };
            Subnet { label, nodes, kind }
        })
        .collect()
}

/// True when every consumer shares a subnet with some plant.
pub fn is_fully_supplied(genes: &[usize], network: &CandidateNetwork) -> bool {
    subnets(genes, network)
        .iter()
        .all(|s| s.kind == SubnetKind::Supplied)
}

/// Repair a layout so that every consumer reaches a plant over active edges.
///
/// Each round picks the smallest plantless subnet (ties: lowest node index),
/// walks the candidate edges leaving it in ascending length and accepts each
/// with probability `line_probability`; when none is accepted the shortest
/// is used. The added edge gets line type `repair_line_type`. Every round
/// merges two subnets, so at most `node_count - 1` rounds run.
///
/// The returned copy has its fitness cleared.
pub fn process_individual_network<R: Rng + ?Sized>(
    individual: &Individual,
    network: &CandidateNetwork,
    catalog: &LineCatalog,
    config: &PlanningConfig,
    rng: &mut R,
) -> Individual {
    let mut genes = individual.genes.clone();
    let repair_gene = config.repair_line_type.clamp(1, catalog.len().max(1));
    let line_probability = config.line_probability.clamp(0.0, 1.0);
    let mut added = 0usize;

    loop {
        let labels = component_map(&genes, network);
        let target = group_components(&labels)
            .into_iter()
            .enumerate()
            .filter(|(_, nodes)| !nodes.iter().any(|&n| network.is_plant(n)))
            .min_by_key(|(_, nodes)| (nodes.len(), nodes[0]));
        let Some((label, _)) = target else {
            break;
        };

        let mut crossing: Vec<&CandidateEdge> = network
            .edges
            .iter()
            .filter(|e| (labels[e.a] == label) != (labels[e.b] == label))
            .collect();
        if crossing.is_empty() {
            warn!(subnet = label, "plantless subnet has no candidate edge to merge over");
            break;
        }
        crossing.sort_by(|x, y| {
            x.length
                .value()
                .total_cmp(&y.length.value())
                .then(x.id.cmp(&y.id))
        });

        let chosen = crossing
            .iter()
            .find(|_| rng.gen_bool(line_probability))
            .copied()
            .unwrap_or(crossing[0]);
        genes[chosen.id.value()] = repair_gene;
        added += 1;
    }

    if added > 0 {
        debug!(added, "repaired layout connectivity");
    }
    Individual::new(genes)
}
