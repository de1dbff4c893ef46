//! Connectivity helpers shared by street-network checks and layout repair.

use crate::{NodeKind, StreetNetwork};
use petgraph::unionfind::UnionFind;
use serde::Serialize;

/// Degree and connectivity figures of the street graph.
#[derive(Debug, Clone, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub connected_components: usize,
    pub min_degree: usize,
    pub avg_degree: f64,
    pub max_degree: usize,
}

/// One connected part of the street graph.
#[derive(Debug, Clone, Serialize)]
pub struct Island {
    pub nodes: usize,
    pub plants: usize,
    pub consumers: usize,
}

impl Island {
    /// Consumers here can never be reached from a plant.
    pub fn is_unsupplied(&self) -> bool {
        self.consumers > 0 && self.plants == 0
    }
}

pub fn graph_stats(network: &StreetNetwork) -> GraphStats {
    let graph = &network.graph;
    let degrees: Vec<usize> = graph
        .node_indices()
        .map(|node| graph.neighbors(node).count())
        .collect();
    let node_count = degrees.len();
    GraphStats {
        node_count,
        edge_count: graph.edge_count(),
        connected_components: find_islands(network).len(),
        min_degree: degrees.iter().copied().min().unwrap_or(0),
        avg_degree: if node_count == 0 {
            0.0
        } else {
            degrees.iter().sum::<usize>() as f64 / node_count as f64
        },
        max_degree: degrees.iter().copied().max().unwrap_or(0),
    }
}

/// Street graph islands in order of their first node.
pub fn find_islands(network: &StreetNetwork) -> Vec<Island> {
    let graph = &network.graph;
    let labels = component_labels(
        graph.node_count(),
        graph
            .edge_indices()
            .filter_map(|e| graph.edge_endpoints(e))
            .map(|(a, b)| (a.index(), b.index())),
    );
    group_components(&labels)
        .into_iter()
        .map(|members| {
            let mut island = Island {
                nodes: members.len(),
                plants: 0,
                consumers: 0,
            };
            for index in members {
                match graph[petgraph::graph::NodeIndex::new(index)].kind {
                    NodeKind::Plant => island.plants += 1,
                    NodeKind::Consumer => island.consumers += 1,
                    NodeKind::Junction => {}
                }
            }
            island
        })
        .collect()
}

/// Connected-component labels over `node_count` arena-indexed nodes.
///
/// Labels are compact (`0..k`) and numbered in order of the first node of
/// each component, so the result is deterministic for a given edge set.
pub fn component_labels<I>(node_count: usize, edges: I) -> Vec<usize>
where
    I: IntoIterator<Item = (usize, usize)>,
{
    let mut sets = UnionFind::<usize>::new(node_count);
    for (a, b) in edges {
        sets.union(a, b);
    }
    let roots = sets.into_labeling();
    let mut compact = vec![usize::MAX; node_count];
    let mut labels = Vec::with_capacity(node_count);
    let mut next = 0;
    for root in roots {
        if compact[root] == usize::MAX {
            compact[root] = next;
            next += 1;
        }
        labels.push(compact[root]);
    }
    labels
}

/// Group node indices by component label.
pub fn group_components(labels: &[usize]) -> Vec<Vec<usize>> {
    let count = labels.iter().map(|&l| l + 1).max().unwrap_or(0);
    let mut groups = vec![Vec::new(); count];
    for (node, &label) in labels.iter().enumerate() {
        groups[label].push(node);
    }
    groups
}
