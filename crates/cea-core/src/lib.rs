//! # cea-core: District Network Modeling Core
//!
//! Provides the fundamental data structures for district electrical/thermal
//! network planning: the street graph produced by GIS preprocessing, the
//! catalog of installable line types, unit newtypes, and a shared error type.
//!
//! ## Design Philosophy
//!
//! The street network is modeled as an **undirected graph** where:
//! - **Nodes**: plants, consumers (buildings), and street intersections
//! - **Edges**: street segments with a length
//!
//! Candidate line layouts are *not* stored in this graph: the topology
//! optimizer derives a complete graph over plants and consumers from it
//! (all-pairs street distances) and encodes layouts as gene vectors over
//! that candidate universe.
//!
//! ## Quick Start
//!
//! ```rust
//! use cea_core::*;
//!
//! let mut streets = StreetNetwork::new();
//! let plant = streets.add_node(SiteNode::new(NodeId::new(0), "Plant", NodeKind::Plant, 0.0, 0.0));
//! let house = streets.add_node(
//!     SiteNode::new(NodeId::new(1), "B1001", NodeKind::Consumer, 100.0, 0.0)
//!         .with_peak_demand(Kilowatts(35.0)),
//! );
//! streets.add_segment(plant, house, StreetSegment::new(SegmentId::new(0), Meters(100.0)));
//!
//! let stats = streets.stats();
//! assert_eq!(stats.num_plants, 1);
//! assert_eq!(stats.num_consumers, 1);
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Line types and their cost/rating data
//! - [`diagnostics`] - Validation and diagnostic reporting
//! - [`graph_utils`] - Connected components and street graph statistics
//! - [`timeseries`] - Hourly demand, solar and temperature records
//! - [`units`] - Unit newtypes (m, kW, Wh, A, K, °C)

use petgraph::{prelude::*, Undirected};
use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod diagnostics;
pub mod error;
pub mod graph_utils;
pub mod timeseries;
pub mod units;

pub use catalog::{LineCatalog, LineType};
pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity, Subject};
pub use error::{CeaError, CeaResult};
pub use graph_utils::*;
pub use petgraph::graph::NodeIndex;
pub use timeseries::{HourlyRecord, HOURS_PER_YEAR};
pub use units::{Amperes, Celsius, Kelvin, Kilowatts, Meters, WattHours};

// Newtype wrappers for IDs for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(usize);

impl NodeId {
    #[inline]
    pub fn new(value: usize) -> Self {
        NodeId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl SegmentId {
    #[inline]
    pub fn new(value: usize) -> Self {
        SegmentId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

/// Role of a node in the street graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Supply point (substation, plant)
    Plant,
    /// Building with a peak demand
    Consumer,
    /// Street intersection, only used for routing
    Junction,
}

impl NodeKind {
    /// Plants and consumers take part in the candidate line universe.
    pub fn is_relevant(self) -> bool {
        matches!(self, NodeKind::Plant | NodeKind::Consumer)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Plant => "plant",
            NodeKind::Consumer => "consumer",
            NodeKind::Junction => "junction",
        }
    }
}

impl std::str::FromStr for NodeKind {
    type Err = CeaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plant" | "substation" => Ok(NodeKind::Plant),
            "consumer" | "building" => Ok(NodeKind::Consumer),
            "junction" | "none" | "" => Ok(NodeKind::Junction),
            other => Err(CeaError::Parse(format!("unknown node kind '{other}'"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SiteNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    /// Projected coordinates (m)
    pub x: f64,
    pub y: f64,
    /// Peak electrical demand, zero for plants and junctions
    pub peak_demand: Kilowatts,
}

impl SiteNode {
    pub fn new(id: NodeId, name: impl Into<String>, kind: NodeKind, x: f64, y: f64) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            x,
            y,
            peak_demand: Kilowatts(0.0),
        }
    }

    pub fn with_peak_demand(mut self, demand: Kilowatts) -> Self {
        self.peak_demand = demand;
        self
    }

    /// Straight-line distance to another node.
    pub fn distance_to(&self, other: &SiteNode) -> Meters {
        Meters(((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt())
    }
}

#[derive(Debug, Clone)]
pub struct StreetSegment {
    pub id: SegmentId,
    pub length: Meters,
}

impl StreetSegment {
    pub fn new(id: SegmentId, length: Meters) -> Self {
        Self { id, length }
    }
}

/// The street graph handed over by GIS preprocessing
#[derive(Debug, Default, Clone)]
pub struct StreetNetwork {
    pub graph: Graph<SiteNode, StreetSegment, Undirected>,
}

/// Element counts and totals for a street network
#[derive(Debug, Default, Clone, Serialize)]
pub struct NetworkStats {
    pub num_plants: usize,
    pub num_consumers: usize,
    pub num_junctions: usize,
    pub num_segments: usize,
    pub total_length_m: f64,
    pub total_peak_demand_kw: f64,
}

impl StreetNetwork {
    pub fn new() -> Self {
        Self {
            graph: Graph::new_undirected(),
        }
    }

    pub fn add_node(&mut self, node: SiteNode) -> NodeIndex {
        self.graph.add_node(node)
    }

    pub fn add_segment(&mut self, a: NodeIndex, b: NodeIndex, segment: StreetSegment) -> EdgeIndex {
        self.graph.add_edge(a, b, segment)
    }

    /// Look up the graph index of a node by its external id.
    pub fn find_node(&self, id: NodeId) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .find(|&idx| self.graph[idx].id == id)
    }

    /// Plants and consumers in graph insertion order.
    pub fn relevant_nodes(&self) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph[idx].kind.is_relevant())
            .collect()
    }

    pub fn stats(&self) -> NetworkStats {
        let mut stats = NetworkStats::default();

        for node in self.graph.node_weights() {
            match node.kind {
                NodeKind::Plant => stats.num_plants += 1,
                NodeKind::Consumer => {
                    stats.num_consumers += 1;
                    stats.total_peak_demand_kw += node.peak_demand.value();
                }
                NodeKind::Junction => stats.num_junctions += 1,
            }
        }

        stats.num_segments = self.graph.edge_count();
        stats.total_length_m = self.graph.edge_weights().map(|s| s.length.value()).sum();
        stats
    }

    /// Validate street data for issues that break candidate generation.
    pub fn validate_into(&self, diag: &mut Diagnostics) {
        let stats = self.stats();

        if stats.num_plants == 0 {
            diag.error(Subject::Network, "Street network has no plant node");
        }
        if stats.num_consumers == 0 {
            diag.warning(Subject::Network, "Street network has no consumer node");
        }
        if stats.num_plants + stats.num_consumers < 2 {
            diag.error(
                Subject::Network,
                "At least two plant/consumer nodes are required to plan a network",
            );
        }

        for idx in self.graph.node_indices() {
            let node = &self.graph[idx];
            let subject = Subject::Node(node.id);
            if !(node.x.is_finite() && node.y.is_finite()) {
                diag.error(subject, "Non-finite coordinates");
            }
            if node.kind == NodeKind::Consumer && node.peak_demand.value() <= 0.0 {
                diag.warning(subject, "Consumer has no peak demand");
            }
            if node.peak_demand.value() < 0.0 {
                diag.error(subject, "Negative peak demand");
            }
            if self.graph.neighbors(idx).next().is_none() && node.kind.is_relevant() {
                diag.warning(subject, "Node touches no street segment");
            }
        }

        for edge in self.graph.edge_references() {
            let subject = Subject::Segment(edge.weight().id);
            if edge.source() == edge.target() {
                diag.error(subject, "Segment is a self-loop");
            }
            let length = edge.weight().length.value();
            if !length.is_finite() || length < 0.0 {
                diag.error(subject, "Invalid segment length");
            } else if length == 0.0 {
                diag.warning(subject, "Zero-length segment");
            }
        }
    }

    /// Validate and convert any error-level issue into a [`CeaError`].
    pub fn validate(&self) -> CeaResult<Diagnostics> {
        let mut diag = Diagnostics::new();
        self.validate_into(&mut diag);
        if let Some(first) = diag.errors().next() {
            return Err(CeaError::Network(format!(
                "{} ({})",
                first,
                diag.summary()
            )));
        }
        Ok(diag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_network() -> StreetNetwork {
        let mut streets = StreetNetwork::new();
        let p = streets.add_node(SiteNode::new(NodeId::new(0), "P", NodeKind::Plant, 0.0, 0.0));
        let j = streets.add_node(SiteNode::new(NodeId::new(1), "J", NodeKind::Junction, 50.0, 0.0));
        let c = streets.add_node(
            SiteNode::new(NodeId::new(2), "C", NodeKind::Consumer, 100.0, 0.0)
                .with_peak_demand(Kilowatts(20.0)),
        );
        streets.add_segment(p, j, StreetSegment::new(SegmentId::new(0), Meters(50.0)));
        streets.add_segment(j, c, StreetSegment::new(SegmentId::new(1), Meters(50.0)));
        streets
    }

    #[test]
    fn stats_count_roles() {
        let stats = line_network().stats();
        assert_eq!(stats.num_plants, 1);
        assert_eq!(stats.num_consumers, 1);
        assert_eq!(stats.num_junctions, 1);
        assert_eq!(stats.num_segments, 2);
        assert_eq!(stats.total_length_m, 100.0);
        assert_eq!(stats.total_peak_demand_kw, 20.0);
    }

    #[test]
    fn relevant_nodes_skip_junctions() {
        let streets = line_network();
        let relevant = streets.relevant_nodes();
        assert_eq!(relevant.len(), 2);
        assert!(relevant
            .iter()
            .all(|&idx| streets.graph[idx].kind != NodeKind::Junction));
    }

    #[test]
    fn validate_flags_missing_plant() {
        let mut streets = StreetNetwork::new();
        streets.add_node(
            SiteNode::new(NodeId::new(0), "C", NodeKind::Consumer, 0.0, 0.0)
                .with_peak_demand(Kilowatts(1.0)),
        );
        assert!(streets.validate().is_err());
    }

    #[test]
    fn validate_accepts_line_network() {
        let diag = line_network().validate().unwrap();
        assert!(!diag.has_errors());
    }

    #[test]
    fn node_kind_parses_aliases() {
        assert_eq!("Substation".parse::<NodeKind>().unwrap(), NodeKind::Plant);
        assert_eq!("building".parse::<NodeKind>().unwrap(), NodeKind::Consumer);
        assert!("tower".parse::<NodeKind>().is_err());
    }
}
