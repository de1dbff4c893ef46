use anyhow::{Context, Result};
use cea_algo::{dispatch_year, simulate_storage, DispatchSummary, StorageSummary, StorageTank};
use cea_cli::cli::DispatchCommands;
use cea_io::importers::{load_hourly_series, load_plant_fleet};
use cea_io::{load_config_or_default, write_dispatch_csv, write_json};
use serde::Serialize;

use crate::commands::storage::print_summary;

#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    storage: &'a StorageSummary,
    dispatch: &'a DispatchSummary,
}

pub fn handle(command: &DispatchCommands) -> Result<()> {
    match command {
        DispatchCommands::Run {
            series,
            plants,
            volume,
            config,
            out,
            summary,
        } => {
            let run_config = load_config_or_default(config.as_deref())?;
            let hours = load_hourly_series(series)?;
            let fleet = load_plant_fleet(plants)?;
            let tank = StorageTank::new(*volume, &run_config.storage)?;

            let storage = simulate_storage(&hours, &tank, &run_config.storage)
                .with_context(|| format!("simulating storage over {}", series.display()))?;
            let dispatch = dispatch_year(
                &storage.residual_demand(),
                &hours,
                &fleet,
                &run_config.dispatch,
            )
            .context("activating plants")?;
            write_dispatch_csv(out, &dispatch)?;

            println!("Dispatch written to {}", out.display());
            print_summary(&storage.summary);
            println!("Plants:");
            for totals in &dispatch.summary.by_kind {
                println!(
                    "  {:<24} {:>12.1} kWh  {:>6} h  {:>10.2} CHF",
                    totals.kind.as_str(),
                    totals.thermal_output_wh / 1_000.0,
                    totals.operating_hours,
                    totals.cost_chf
                );
            }
            println!("  Total cost      : {:.2} CHF", dispatch.summary.cost_chf);
            println!("  CO2             : {:.3} t", dispatch.summary.co2_kg / 1_000.0);

            if let Some(path) = summary {
                write_json(
                    path,
                    &RunSummary {
                        storage: &storage.summary,
                        dispatch: &dispatch.summary,
                    },
                )?;
            }
            Ok(())
        }
    }
}
