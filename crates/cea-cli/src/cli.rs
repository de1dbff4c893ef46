use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cea",
    author,
    version,
    about = "District network planning and thermal dispatch",
    long_about = None
)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Electrical network layout optimization
    Network {
        #[command(subcommand)]
        command: NetworkCommands,
    },
    /// Line catalog utilities
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Seasonal thermal storage simulation and sizing
    Storage {
        #[command(subcommand)]
        command: StorageCommands,
    },
    /// Plant activation on the demand left after storage
    Dispatch {
        #[command(subcommand)]
        command: DispatchCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum NetworkCommands {
    /// Optimize the line layout with the genetic algorithm
    Optimize {
        /// Node table (id,name,kind,x,y,peak_demand_kw)
        #[arg(long, value_hint = ValueHint::FilePath)]
        nodes: PathBuf,
        /// Street segment table (id,from,to,length_m)
        #[arg(long, value_hint = ValueHint::FilePath)]
        streets: PathBuf,
        /// Line catalog CSV
        #[arg(long, value_hint = ValueHint::FilePath)]
        catalog: PathBuf,
        /// TOML run configuration
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: Option<PathBuf>,
        /// Output CSV with one row per installed line
        #[arg(long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
        /// Also write cost and generation history as JSON
        #[arg(long, value_hint = ValueHint::FilePath)]
        summary: Option<PathBuf>,
        /// Override the configured random seed
        #[arg(long)]
        seed: Option<u64>,
        /// Worker threads ("auto" or a number)
        #[arg(long)]
        threads: Option<String>,
    },
    /// Print statistics of the candidate line universe
    Candidates {
        #[arg(long, value_hint = ValueHint::FilePath)]
        nodes: PathBuf,
        #[arg(long, value_hint = ValueHint::FilePath)]
        streets: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// Check a line catalog and list its entries
    Validate {
        #[arg(long, value_hint = ValueHint::FilePath)]
        catalog: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum StorageCommands {
    /// Simulate one tank over an hourly series
    Simulate {
        /// Hourly series CSV (temperatures in °C)
        #[arg(long, value_hint = ValueHint::FilePath)]
        series: PathBuf,
        /// Tank volume (m³)
        #[arg(long)]
        volume: f64,
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: Option<PathBuf>,
        /// Output trajectory CSV
        #[arg(long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
        /// Also write the annual summary as JSON
        #[arg(long, value_hint = ValueHint::FilePath)]
        summary: Option<PathBuf>,
    },
    /// Simulate several tank volumes in parallel
    Size {
        #[arg(long, value_hint = ValueHint::FilePath)]
        series: PathBuf,
        /// Comma-separated volumes (m³)
        #[arg(long)]
        volumes: String,
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: Option<PathBuf>,
        /// Directory receiving one folder per volume and the manifest
        #[arg(long, value_hint = ValueHint::DirPath)]
        out_dir: PathBuf,
        /// Worker threads ("auto" or a number)
        #[arg(long, default_value = "auto")]
        threads: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum DispatchCommands {
    /// Storage simulation followed by plant activation on the missing energy
    Run {
        #[arg(long, value_hint = ValueHint::FilePath)]
        series: PathBuf,
        /// Plant fleet CSV (kind,capacity_kw,...)
        #[arg(long, value_hint = ValueHint::FilePath)]
        plants: PathBuf,
        /// Tank volume (m³)
        #[arg(long)]
        volume: f64,
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: Option<PathBuf>,
        /// Output CSV with one row per started plant and hour
        #[arg(long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
        /// Also write storage and dispatch summaries as JSON
        #[arg(long, value_hint = ValueHint::FilePath)]
        summary: Option<PathBuf>,
    },
}
