use super::{open_reader, ImportError};
use anyhow::Result;
use cea_core::{
    Diagnostics, Kilowatts, Meters, NodeId, NodeIndex, NodeKind, SegmentId, SiteNode,
    StreetNetwork, StreetSegment,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// A street graph together with the issues found while building it.
#[derive(Debug)]
pub struct StreetImport {
    pub network: StreetNetwork,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Deserialize)]
struct NodeRow {
    id: usize,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    x: f64,
    y: f64,
    #[serde(default)]
    peak_demand_kw: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct StreetRow {
    id: usize,
    from: usize,
    to: usize,
    #[serde(default)]
    length_m: Option<f64>,
}

/// Build the street graph from `nodes.csv` and `streets.csv`.
///
/// Segments without a length use the straight-line distance between their
/// end nodes. Unknown or duplicate node ids fail the import; softer problems
/// (zero-length segments, consumers without demand) land in the diagnostics.
pub fn load_street_network(nodes_path: &Path, streets_path: &Path) -> Result<StreetImport> {
    let mut network = StreetNetwork::new();
    let mut diagnostics = Diagnostics::new();
    let mut index_of: HashMap<usize, NodeIndex> = HashMap::new();

    let mut reader = open_reader(nodes_path)?;
    for (i, row) in reader.deserialize::<NodeRow>().enumerate() {
        let row = row.map_err(|e| ImportError::csv(nodes_path, e))?;
        let kind: NodeKind = row
            .kind
            .as_deref()
            .unwrap_or("")
            .parse()
            .map_err(|e| ImportError::row(nodes_path, i as u64 + 2, e))?;
        if index_of.contains_key(&row.id) {
            return Err(ImportError::DuplicateNode {
                path: nodes_path.to_path_buf(),
                id: row.id,
            }
            .into());
        }
        let name = row.name.unwrap_or_else(|| format!("node{}", row.id));
        let node = SiteNode::new(NodeId::new(row.id), name, kind, row.x, row.y)
            .with_peak_demand(Kilowatts(row.peak_demand_kw.unwrap_or(0.0)));
        index_of.insert(row.id, network.add_node(node));
    }
    if index_of.is_empty() {
        return Err(ImportError::Empty {
            path: nodes_path.to_path_buf(),
        }
        .into());
    }

    let mut reader = open_reader(streets_path)?;
    let mut derived = 0usize;
    for row in reader.deserialize::<StreetRow>() {
        let row = row.map_err(|e| ImportError::csv(streets_path, e))?;
        let lookup = |node: usize| {
            index_of.get(&node).copied().ok_or(ImportError::UnknownNode {
                path: streets_path.to_path_buf(),
                segment: row.id,
                node,
            })
        };
        let a = lookup(row.from)?;
        let b = lookup(row.to)?;
        let length = match row.length_m {
            Some(length) => Meters(length),
            None => {
                derived += 1;
                network.graph[a].distance_to(&network.graph[b])
            }
        };
        network.add_segment(a, b, StreetSegment::new(SegmentId::new(row.id), length));
    }
    if derived > 0 {
        debug!(segments = derived, "segment lengths taken from coordinates");
    }

    network.validate_into(&mut diagnostics);
    let stats = network.stats();
    info!(
        plants = stats.num_plants,
        consumers = stats.num_consumers,
        junctions = stats.num_junctions,
        segments = stats.num_segments,
        warnings = diagnostics.warning_count(),
        "loaded street network"
    );

    Ok(StreetImport {
        network,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_inputs(dir: &Path, streets: &str) -> (std::path::PathBuf, std::path::PathBuf) {
        let nodes = dir.join("nodes.csv");
        let segments = dir.join("streets.csv");
        fs::write(
            &nodes,
            "id,name,kind,x,y,peak_demand_kw\n\
             0,Plant,plant,0,0,\n\
             1,J1,junction,30,40,\n\
             2,B1001,consumer,60,80,12.5\n",
        )
        .unwrap();
        fs::write(&segments, streets).unwrap();
        (nodes, segments)
    }

    #[test]
    fn loads_nodes_and_segments() {
        let dir = tempdir().unwrap();
        let (nodes, streets) = write_inputs(dir.path(), "id,from,to,length_m\n0,0,1,55\n1,1,2,\n");
        let import = load_street_network(&nodes, &streets).unwrap();

        let stats = import.network.stats();
        assert_eq!(stats.num_plants, 1);
        assert_eq!(stats.num_consumers, 1);
        assert_eq!(stats.num_junctions, 1);
        // 55 given + 50 from coordinates
        assert!((stats.total_length_m - 105.0).abs() < 1e-9);
        assert_eq!(stats.total_peak_demand_kw, 12.5);
        assert!(!import.diagnostics.has_errors());
    }

    #[test]
    fn unknown_node_is_reported() {
        let dir = tempdir().unwrap();
        let (nodes, streets) = write_inputs(dir.path(), "id,from,to,length_m\n7,0,9,10\n");
        let err = load_street_network(&nodes, &streets).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("segment 7"));
        assert!(message.contains("unknown node 9"));
    }

    #[test]
    fn bad_kind_names_line() {
        let dir = tempdir().unwrap();
        let nodes = dir.path().join("nodes.csv");
        fs::write(
            &nodes,
            "id,name,kind,x,y,peak_demand_kw\n0,P,plant,0,0,\n1,T,tower,1,1,\n",
        )
        .unwrap();
        let streets = dir.path().join("streets.csv");
        fs::write(&streets, "id,from,to,length_m\n").unwrap();
        let err = load_street_network(&nodes, &streets).unwrap_err();
        assert!(err.to_string().contains("tower"));
    }

    #[test]
    fn duplicate_node_id_fails() {
        let dir = tempdir().unwrap();
        let nodes = dir.path().join("nodes.csv");
        fs::write(
            &nodes,
            "id,name,kind,x,y,peak_demand_kw\n0,P,plant,0,0,\n0,C,consumer,1,1,3\n",
        )
        .unwrap();
        let streets = dir.path().join("streets.csv");
        fs::write(&streets, "id,from,to,length_m\n").unwrap();
        let err = load_street_network(&nodes, &streets).unwrap_err();
        assert!(err.to_string().contains("duplicate node id 0"));
    }
}
