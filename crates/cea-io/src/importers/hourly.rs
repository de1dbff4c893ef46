use super::{open_reader, ImportError};
use anyhow::{Context, Result};
use cea_core::{Celsius, HourlyRecord, HOURS_PER_YEAR};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Heat-pump source temperature used when a column is left out (°C).
const DEFAULT_SOURCE_TEMP_C: f64 = 10.0;

#[derive(Debug, Deserialize)]
struct HourlyRow {
    #[serde(default)]
    hour: Option<usize>,
    network_demand_wh: f64,
    solar_available_wh: f64,
    dh_supply_temp_c: f64,
    dh_return_temp_c: f64,
    ambient_temp_c: f64,
    mass_flow_kg_s: f64,
    #[serde(default)]
    sewage_temp_c: Option<f64>,
    #[serde(default)]
    ground_temp_c: Option<f64>,
    #[serde(default)]
    lake_temp_c: Option<f64>,
}

fn kelvin(celsius: f64) -> f64 {
    Celsius(celsius).to_kelvin().value()
}

impl HourlyRow {
    fn into_record(self, position: usize) -> HourlyRecord {
        let ground_c = self.ground_temp_c.unwrap_or(DEFAULT_SOURCE_TEMP_C);
        HourlyRecord {
            hour: self.hour.unwrap_or(position),
            network_demand_wh: self.network_demand_wh,
            solar_available_wh: self.solar_available_wh,
            dh_supply_temp_k: kelvin(self.dh_supply_temp_c),
            dh_return_temp_k: kelvin(self.dh_return_temp_c),
            ambient_temp_k: kelvin(self.ambient_temp_c),
            mass_flow_kg_s: self.mass_flow_kg_s,
            sewage_temp_k: kelvin(self.sewage_temp_c.unwrap_or(ground_c)),
            ground_temp_k: kelvin(ground_c),
            lake_temp_k: kelvin(self.lake_temp_c.unwrap_or(ground_c)),
        }
    }
}

/// Read an hourly series with temperatures in °C.
///
/// Missing `hour` values take the row position. Source temperatures default
/// to the ground temperature, which itself defaults to 10 °C. Every record is
/// validated; the first bad hour fails the import.
pub fn load_hourly_series(path: &Path) -> Result<Vec<HourlyRecord>> {
    let mut reader = open_reader(path)?;
    let mut series = Vec::with_capacity(HOURS_PER_YEAR);
    for (position, row) in reader.deserialize::<HourlyRow>().enumerate() {
        let row = row.map_err(|e| ImportError::csv(path, e))?;
        let record = row.into_record(position);
        record
            .validate()
            .with_context(|| format!("{}: line {}", path.display(), position + 2))?;
        series.push(record);
    }

    if series.is_empty() {
        return Err(ImportError::Empty {
            path: path.to_path_buf(),
        }
        .into());
    }
    if series.len() != HOURS_PER_YEAR {
        warn!(
            hours = series.len(),
            path = %path.display(),
            "series does not cover a full year"
        );
    }
    info!(hours = series.len(), path = %path.display(), "loaded hourly series");
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const HEADER: &str = "hour,network_demand_wh,solar_available_wh,dh_supply_temp_c,dh_return_temp_c,ambient_temp_c,mass_flow_kg_s,sewage_temp_c,ground_temp_c,lake_temp_c\n";

    #[test]
    fn converts_celsius_to_kelvin() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hourly.csv");
        fs::write(
            &path,
            format!("{HEADER}0,1000,0,70,40,-5,1.2,20,10,6\n1,500,800,70,40,0,1.0,,,\n"),
        )
        .unwrap();

        let series = load_hourly_series(&path).unwrap();
        assert_eq!(series.len(), 2);
        assert!((series[0].dh_supply_temp_k - 343.15).abs() < 1e-9);
        assert!((series[0].ambient_temp_k - 268.15).abs() < 1e-9);
        assert!((series[0].sewage_temp_k - 293.15).abs() < 1e-9);
        assert!((series[1].lake_temp_k - 283.15).abs() < 1e-9);
        assert_eq!(series[1].solar_available_wh, 800.0);
    }

    #[test]
    fn hour_defaults_to_position() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hourly.csv");
        fs::write(
            &path,
            "network_demand_wh,solar_available_wh,dh_supply_temp_c,dh_return_temp_c,ambient_temp_c,mass_flow_kg_s\n\
             10,0,70,40,5,1\n20,0,70,40,5,1\n30,0,70,40,5,1\n",
        )
        .unwrap();
        let series = load_hourly_series(&path).unwrap();
        let hours: Vec<_> = series.iter().map(|r| r.hour).collect();
        assert_eq!(hours, vec![0, 1, 2]);
        assert!((series[2].ground_temp_k - 283.15).abs() < 1e-9);
    }

    #[test]
    fn negative_demand_names_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hourly.csv");
        fs::write(&path, format!("{HEADER}0,1000,0,70,40,5,1,,,\n1,-3,0,70,40,5,1,,,\n")).unwrap();
        let err = load_hourly_series(&path).unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn header_only_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hourly.csv");
        fs::write(&path, HEADER).unwrap();
        assert!(load_hourly_series(&path).is_err());
    }
}
