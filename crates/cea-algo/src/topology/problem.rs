//! Candidate line universe derived from the street graph.
//!
//! Every pair of relevant nodes (plants and consumers) that is connected
//! through the street graph becomes one candidate edge whose length is the
//! street shortest-path distance. Layouts are gene vectors indexed by
//! [`CandidateId`].

use cea_core::{
    CeaError, CeaResult, Meters, NodeIndex, NodeKind, SegmentId, SiteNode, StreetNetwork,
};
use petgraph::algo::astar;
use tracing::debug;

/// Position of a candidate edge in the gene vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateId(pub usize);

impl CandidateId {
    pub fn new(id: usize) -> Self {
        CandidateId(id)
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

/// A line that could be laid between two relevant nodes.
#[derive(Debug, Clone)]
pub struct CandidateEdge {
    pub id: CandidateId,
    /// Arena index of the first endpoint (`a < b`)
    pub a: usize,
    pub b: usize,
    /// Street shortest-path distance between the endpoints
    pub length: Meters,
    /// Street segments the line follows, in path order
    pub street_segments: Vec<SegmentId>,
}

/// Complete candidate graph over the plants and consumers of a street network.
///
/// Nodes live in an arena (`nodes[i]`), street graph indices are kept in
/// `street_index[i]` so paths can be mapped back onto streets.
#[derive(Debug, Clone)]
pub struct CandidateNetwork {
    pub nodes: Vec<SiteNode>,
    pub street_index: Vec<NodeIndex>,
    /// Street distance between arena nodes (m), `INFINITY` when unreachable
    pub distance_matrix: Vec<Vec<f64>>,
    /// Street node sequence between arena nodes, empty when unreachable
    pub path_matrix: Vec<Vec<Vec<NodeIndex>>>,
    pub edges: Vec<CandidateEdge>,
}

impl CandidateNetwork {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Length of the gene vector
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_plant(&self, node: usize) -> bool {
        self.nodes[node].kind == NodeKind::Plant
    }

    pub fn plants(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.nodes.len()).filter(|&i| self.nodes[i].kind == NodeKind::Plant)
    }

    pub fn consumers(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.nodes.len()).filter(|&i| self.nodes[i].kind == NodeKind::Consumer)
    }

    /// Edges whose gene is non-zero, as `(a, b)` endpoint pairs.
    pub fn active_edges<'a>(
        &'a self,
        genes: &'a [usize],
    ) -> impl Iterator<Item = &'a CandidateEdge> + 'a {
        self.edges
            .iter()
            .zip(genes.iter())
            .filter(|(_, &gene)| gene != 0)
            .map(|(edge, _)| edge)
    }

    /// Total consumer peak demand (kW)
    pub fn total_demand_kw(&self) -> f64 {
        self.nodes.iter().map(|n| n.peak_demand.value()).sum()
    }
}

/// Build the candidate universe from a street network.
///
/// Runs A* (zero heuristic, segment lengths as weights) between every pair of
/// plants/consumers. Fails when fewer than two relevant nodes exist, when no
/// plant exists, or when some consumer cannot reach any plant over streets.
pub fn initial_network(streets: &StreetNetwork) -> CeaResult<CandidateNetwork> {
    let street_index = streets.relevant_nodes();
    if street_index.len() < 2 {
        return Err(CeaError::Network(format!(
            "at least two plant/consumer nodes are required, found {}",
            street_index.len()
        )));
    }

    let nodes: Vec<SiteNode> = street_index
        .iter()
        .map(|&idx| streets.graph[idx].clone())
        .collect();
    if !nodes.iter().any(|n| n.kind == NodeKind::Plant) {
        return Err(CeaError::Network("street network has no plant node".into()));
    }

    let n = nodes.len();
    let graph = &streets.graph;
    let mut distance_matrix = vec![vec![f64::INFINITY; n]; n];
    let mut path_matrix = vec![vec![Vec::new(); n]; n];
    let mut edges = Vec::new();

    for i in 0..n {
        distance_matrix[i][i] = 0.0;
        path_matrix[i][i] = vec![street_index[i]];
        for j in (i + 1)..n {
            let goal = street_index[j];
            let Some((cost, path)) = astar(
                graph,
                street_index[i],
                |finish| finish == goal,
                |e| e.weight().length.value(),
                |_| 0.0,
            ) else {
                continue;
            };

            let street_segments = path
                .windows(2)
                .filter_map(|w| {
                    graph
                        .edges_connecting(w[0], w[1])
                        .min_by(|x, y| {
                            x.weight().length.value().total_cmp(&y.weight().length.value())
                        })
                        .map(|e| e.weight().id)
                })
                .collect();

            distance_matrix[i][j] = cost;
            distance_matrix[j][i] = cost;
            let mut reversed = path.clone();
            reversed.reverse();
            path_matrix[i][j] = path;
            path_matrix[j][i] = reversed;

            edges.push(CandidateEdge {
                id: CandidateId::new(edges.len()),
                a: i,
                b: j,
                length: Meters(cost),
                street_segments,
            });
        }
    }

    for consumer in (0..n).filter(|&i| nodes[i].kind == NodeKind::Consumer) {
        let reachable = (0..n)
            .filter(|&p| nodes[p].kind == NodeKind::Plant)
            .any(|p| distance_matrix[consumer][p].is_finite());
        if !reachable {
            return Err(CeaError::Network(format!(
                "consumer {} ({}) has no street path to any plant",
                nodes[consumer].id.value(),
                nodes[consumer].name
            )));
        }
    }

    debug!(
        nodes = n,
        candidates = edges.len(),
        "built candidate line universe"
    );

    Ok(CandidateNetwork {
        nodes,
        street_index,
        distance_matrix,
        path_matrix,
        edges,
    })
}
