//! CSV importers for the planning and dispatch inputs.
//!
//! | file            | reader                     | produces                      |
//! |-----------------|----------------------------|-------------------------------|
//! | `nodes.csv` + `streets.csv` | [`load_street_network`] | [`StreetImport`]   |
//! | line catalog    | [`load_line_catalog`]      | [`cea_core::LineCatalog`]     |
//! | hourly series   | [`load_hourly_series`]     | `Vec<HourlyRecord>` (K)       |
//! | plant fleet     | [`load_plant_fleet`]       | [`cea_algo::PlantFleet`]      |
//!
//! Temperatures are read in °C and converted to Kelvin on import. Row errors
//! carry the file name and line number.

mod catalog;
mod hourly;
mod plants;
mod streets;

pub use catalog::load_line_catalog;
pub use hourly::load_hourly_series;
pub use plants::load_plant_fleet;
pub use streets::{load_street_network, StreetImport};

use cea_core::CeaError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures tied to a specific input file.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("{}: line {line}: {message}", .path.display())]
    Row {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("{}: duplicate node id {id}", .path.display())]
    DuplicateNode { path: PathBuf, id: usize },

    #[error("{}: segment {segment} references unknown node {node}", .path.display())]
    UnknownNode {
        path: PathBuf,
        segment: usize,
        node: usize,
    },

    #[error("{}: file contains no data rows", .path.display())]
    Empty { path: PathBuf },
}

impl ImportError {
    fn row(path: &Path, line: u64, message: impl ToString) -> Self {
        ImportError::Row {
            path: path.to_path_buf(),
            line,
            message: message.to_string(),
        }
    }

    /// Wrap a csv deserialization failure, keeping its data line.
    fn csv(path: &Path, err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        Self::row(path, line, err)
    }
}

impl From<ImportError> for CeaError {
    fn from(err: ImportError) -> Self {
        CeaError::Parse(err.to_string())
    }
}

fn open_reader(path: &Path) -> anyhow::Result<csv::Reader<std::fs::File>> {
    use anyhow::Context;
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))
}
