//! Small fixtures shared by the topology unit tests.

use super::problem::{initial_network, CandidateNetwork};
use cea_core::{
    Kilowatts, LineCatalog, LineType, Meters, NodeId, NodeKind, SegmentId, SiteNode, StreetNetwork,
    StreetSegment,
};

/// Plant at the origin, consumers 100 m and 200 m away on separate streets.
pub fn star_streets() -> StreetNetwork {
    let mut s = StreetNetwork::new();
    let p = s.add_node(SiteNode::new(NodeId::new(0), "P", NodeKind::Plant, 0.0, 0.0));
    let c1 = s.add_node(
        SiteNode::new(NodeId::new(1), "C1", NodeKind::Consumer, 100.0, 0.0)
            .with_peak_demand(Kilowatts(10.0)),
    );
    let c2 = s.add_node(
        SiteNode::new(NodeId::new(2), "C2", NodeKind::Consumer, -200.0, 0.0)
            .with_peak_demand(Kilowatts(5.0)),
    );
    s.add_segment(p, c1, StreetSegment::new(SegmentId::new(0), Meters(100.0)));
    s.add_segment(p, c2, StreetSegment::new(SegmentId::new(1), Meters(200.0)));
    s
}

/// Candidate edges: `0 = P-C1 (100 m)`, `1 = P-C2 (200 m)`, `2 = C1-C2 (300 m)`.
pub fn star_network() -> CandidateNetwork {
    initial_network(&star_streets()).expect("star fixture is valid")
}

pub fn catalog() -> LineCatalog {
    LineCatalog::new(vec![
        LineType::new(1, "Cu 16", 50.0, 10.0, 25, 0.02, 16.0),
        LineType::new(2, "Cu 95", 150.0, 20.0, 40, 0.02, 95.0),
    ])
    .expect("fixture catalog is valid")
}
