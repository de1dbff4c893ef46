//! CSV and JSON writers for optimizer, storage and dispatch results.
//!
//! Temperatures are written in °C, energies in Wh, to match the importers.

use anyhow::{Context, Result};
use cea_algo::{AnnualDispatch, CandidateNetwork, LoadFlowResult, StorageSimulation};
use cea_core::{Kelvin, LineCatalog};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize)]
struct LayoutRow<'a> {
    edge: usize,
    from: &'a str,
    to: &'a str,
    length_m: f64,
    line_type: usize,
    line_name: &'a str,
    current_a: f64,
    loading: f64,
    loss_kw: f64,
}

/// Write one row per installed line of `genes`. Returns the number of rows.
pub fn write_layout_csv(
    path: &Path,
    network: &CandidateNetwork,
    catalog: &LineCatalog,
    genes: &[usize],
    load_flow: &LoadFlowResult,
) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV writer for {}", path.display()))?;

    let mut rows = 0;
    for edge in network.active_edges(genes) {
        let index = edge.id.value();
        let gene = genes[index];
        let row = LayoutRow {
            edge: index,
            from: &network.nodes[edge.a].name,
            to: &network.nodes[edge.b].name,
            length_m: edge.length.value(),
            line_type: gene,
            line_name: catalog.get(gene).map(|t| t.name.as_str()).unwrap_or(""),
            current_a: load_flow.edge_current_a.get(index).copied().unwrap_or(0.0),
            loading: load_flow.edge_loading.get(index).copied().unwrap_or(0.0),
            loss_kw: load_flow.edge_loss_kw.get(index).copied().unwrap_or(0.0),
        };
        wtr.serialize(&row).context("writing layout row")?;
        rows += 1;
    }

    wtr.flush().context("flushing CSV writer")?;
    Ok(rows)
}

#[derive(Debug, Serialize)]
struct StorageRow {
    hour: usize,
    mode: &'static str,
    temp_c: f64,
    content_wh: f64,
    energy_to_storage_wh: f64,
    energy_from_storage_wh: f64,
    delivered_wh: f64,
    aux_charge_wh: f64,
    aux_discharge_wh: f64,
    heat_loss_wh: f64,
    missing_wh: f64,
    rejected_wh: f64,
    mass_flow_kg_s: f64,
}

/// Write the hour-by-hour storage trajectory.
pub fn write_storage_csv(path: &Path, simulation: &StorageSimulation) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV writer for {}", path.display()))?;

    for step in &simulation.steps {
        wtr.serialize(StorageRow {
            hour: step.hour,
            mode: step.mode.as_str(),
            temp_c: Kelvin(step.new_temp_k).to_celsius().value(),
            content_wh: step.new_content_wh,
            energy_to_storage_wh: step.energy_to_storage_wh,
            energy_from_storage_wh: step.energy_from_storage_wh,
            delivered_wh: step.delivered_from_storage_wh,
            aux_charge_wh: step.aux_charge_wh,
            aux_discharge_wh: step.aux_discharge_wh,
            heat_loss_wh: step.heat_loss_wh,
            missing_wh: step.missing_wh,
            rejected_wh: step.rejected_wh,
            mass_flow_kg_s: step.adjusted_mass_flow_kg_s,
        })
        .with_context(|| format!("writing storage row for hour {}", step.hour))?;
    }

    wtr.flush().context("flushing CSV writer")?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct DispatchRow {
    hour: usize,
    demand_wh: f64,
    plant: &'static str,
    thermal_output_wh: f64,
    fuel_or_source_wh: f64,
    electricity_wh: f64,
    cop: Option<f64>,
    cost_chf: f64,
    primary_energy_wh: f64,
    co2_kg: f64,
}

/// Write one row per started plant and hour.
///
/// Hours where nothing had to be started still get a row with an empty
/// plant so the file covers the full series.
pub fn write_dispatch_csv(path: &Path, dispatch: &AnnualDispatch) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV writer for {}", path.display()))?;

    for hour in &dispatch.hours {
        if hour.allocations.is_empty() {
            wtr.serialize(DispatchRow {
                hour: hour.hour,
                demand_wh: hour.demand_wh,
                plant: "",
                thermal_output_wh: 0.0,
                fuel_or_source_wh: 0.0,
                electricity_wh: 0.0,
                cop: None,
                cost_chf: 0.0,
                primary_energy_wh: 0.0,
                co2_kg: 0.0,
            })
            .context("writing dispatch row")?;
            continue;
        }
        for a in &hour.allocations {
            wtr.serialize(DispatchRow {
                hour: hour.hour,
                demand_wh: hour.demand_wh,
                plant: a.kind.as_str(),
                thermal_output_wh: a.thermal_output_wh,
                fuel_or_source_wh: a.fuel_or_source_wh,
                electricity_wh: a.electricity_wh,
                cop: a.cop,
                cost_chf: a.marginal_cost_chf,
                primary_energy_wh: a.primary_energy_wh,
                co2_kg: a.co2_kg,
            })
            .context("writing dispatch row")?;
        }
    }

    wtr.flush().context("flushing CSV writer")?;
    Ok(())
}

/// Pretty-printed JSON, used for run summaries.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing summary to JSON")?;
    fs::write(path, json).with_context(|| format!("writing JSON to {}", path.display()))?;
    Ok(())
}
