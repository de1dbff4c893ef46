use super::{open_reader, ImportError};
use anyhow::{Context, Result};
use cea_algo::{Plant, PlantFleet, PlantKind};
use cea_core::Kilowatts;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct PlantRow {
    kind: String,
    capacity_kw: f64,
    #[serde(default)]
    min_part_load: Option<f64>,
    #[serde(default)]
    thermal_efficiency: Option<f64>,
    #[serde(default)]
    electrical_efficiency: Option<f64>,
}

/// Read the installed plants.
///
/// Columns: `kind,capacity_kw` plus optional `min_part_load`,
/// `thermal_efficiency` and `electrical_efficiency`.
pub fn load_plant_fleet(path: &Path) -> Result<PlantFleet> {
    let mut reader = open_reader(path)?;
    let mut plants = Vec::new();
    for (i, row) in reader.deserialize::<PlantRow>().enumerate() {
        let row = row.map_err(|e| ImportError::csv(path, e))?;
        let kind: PlantKind = row
            .kind
            .parse()
            .map_err(|e| ImportError::row(path, i as u64 + 2, e))?;
        let plant = Plant::new(kind, Kilowatts(row.capacity_kw).to_watts())
            .with_min_part_load(row.min_part_load.unwrap_or(0.0))
            .with_efficiencies(
                row.thermal_efficiency.unwrap_or(1.0),
                row.electrical_efficiency.unwrap_or(0.0),
            );
        plants.push(plant);
    }

    let fleet =
        PlantFleet::new(plants).with_context(|| format!("validating plants {}", path.display()))?;
    info!(
        plants = fleet.plants().len(),
        capacity_kw = fleet.total_capacity_w() / 1_000.0,
        "loaded plant fleet"
    );
    Ok(fleet)
}
