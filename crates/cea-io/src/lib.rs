//! # cea-io: Input and output for district network planning
//!
//! Reads the CSV and TOML inputs of a planning or dispatch run and writes
//! its results back out.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cea_io::importers::{load_line_catalog, load_street_network};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let import = load_street_network(Path::new("nodes.csv"), Path::new("streets.csv"))?;
//!     let catalog = load_line_catalog(Path::new("catalog.csv"))?;
//!     println!("{} line types, {}", catalog.len(), import.diagnostics.summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`config`] - TOML run configuration
//! - [`importers`] - street graph, line catalog, hourly series and plant fleet readers
//! - [`exporters`] - layout, storage trajectory and dispatch writers

pub mod config;
pub mod exporters;
pub mod importers;

pub use config::{load_config, load_config_or_default, save_config};
pub use exporters::{write_dispatch_csv, write_json, write_layout_csv, write_storage_csv};
pub use importers::{
    load_hourly_series, load_line_catalog, load_plant_fleet, load_street_network, ImportError,
    StreetImport,
};
