use super::{open_reader, ImportError};
use anyhow::{Context, Result};
use cea_core::{LineCatalog, LineType};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct LineTypeRow {
    index: usize,
    name: String,
    current_rating_a: f64,
    price_per_m: f64,
    lifetime_years: u32,
    om_factor: f64,
    cross_section_mm2: f64,
    #[serde(default)]
    resistance_ohm_per_km: Option<f64>,
}

impl From<LineTypeRow> for LineType {
    fn from(row: LineTypeRow) -> Self {
        let line = LineType::new(
            row.index,
            row.name,
            row.current_rating_a,
            row.price_per_m,
            row.lifetime_years,
            row.om_factor,
            row.cross_section_mm2,
        );
        match row.resistance_ohm_per_km {
            Some(r) => line.with_resistance(r),
            None => line,
        }
    }
}

/// Read a line catalog. Rows are ordered by `index` before validation.
///
/// Columns: `index,name,current_rating_a,price_per_m,lifetime_years,om_factor,cross_section_mm2`
/// and an optional `resistance_ohm_per_km` (copper from the cross-section when empty).
pub fn load_line_catalog(path: &Path) -> Result<LineCatalog> {
    let mut reader = open_reader(path)?;
    let mut types = Vec::new();
    for row in reader.deserialize::<LineTypeRow>() {
        let row = row.map_err(|e| ImportError::csv(path, e))?;
        types.push(LineType::from(row));
    }
    types.sort_by_key(|t| t.index);

    let catalog =
        LineCatalog::new(types).with_context(|| format!("validating catalog {}", path.display()))?;
    info!(types = catalog.len(), path = %path.display(), "loaded line catalog");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const HEADER: &str =
        "index,name,current_rating_a,price_per_m,lifetime_years,om_factor,cross_section_mm2,resistance_ohm_per_km\n";

    #[test]
    fn reads_rows_in_index_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        fs::write(
            &path,
            format!("{HEADER}2,NAYY 4x150,270,18,40,0.01,150,0.206\n1,NAYY 4x50,142,10,40,0.01,50,\n"),
        )
        .unwrap();

        let catalog = load_line_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        let small = catalog.get(1).unwrap();
        assert_eq!(small.name, "NAYY 4x50");
        assert!((small.resistance_ohm_per_km - 0.0172 / 50.0 * 1_000.0).abs() < 1e-12);
        assert_eq!(catalog.get(2).unwrap().resistance_ohm_per_km, 0.206);
    }

    #[test]
    fn gap_in_indices_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        fs::write(
            &path,
            format!("{HEADER}1,a,100,10,30,0.01,16,\n3,b,200,20,30,0.01,50,\n"),
        )
        .unwrap();
        let err = load_line_catalog(&path).unwrap_err();
        assert!(format!("{err:#}").contains("indices must run"));
    }

    #[test]
    fn malformed_number_reports_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        fs::write(&path, format!("{HEADER}1,a,lots,10,30,0.01,16,\n")).unwrap();
        let err = load_line_catalog(&path).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        fs::write(&path, HEADER).unwrap();
        assert!(load_line_catalog(&path).is_err());
    }
}
