use anyhow::{Context, Result};
use cea_algo::{simulate_storage, StorageSummary, StorageTank};
use cea_batch::{jobs_from_volumes, run_sizing_batch, SizingBatchConfig};
use cea_cli::cli::StorageCommands;
use cea_core::{Kelvin, WattHours};
use cea_io::importers::load_hourly_series;
use cea_io::{load_config_or_default, write_json, write_storage_csv};

use crate::commands::util::{parse_volumes, resolve_threads};

pub fn handle(command: &StorageCommands) -> Result<()> {
    match command {
        StorageCommands::Simulate {
            series,
            volume,
            config,
            out,
            summary,
        } => {
            let run_config = load_config_or_default(config.as_deref())?;
            let hours = load_hourly_series(series)?;
            let tank = StorageTank::new(*volume, &run_config.storage)?;
            let simulation = simulate_storage(&hours, &tank, &run_config.storage)
                .with_context(|| format!("simulating storage over {}", series.display()))?;
            write_storage_csv(out, &simulation)?;

            println!("Storage trajectory written to {}", out.display());
            print_summary(&simulation.summary);
            if let Some(path) = summary {
                write_json(path, &simulation.summary)?;
            }
            Ok(())
        }
        StorageCommands::Size {
            series,
            volumes,
            config,
            out_dir,
            threads,
        } => {
            let run_config = load_config_or_default(config.as_deref())?;
            let volumes = parse_volumes(volumes)?;
            let batch = SizingBatchConfig {
                jobs: jobs_from_volumes(&volumes),
                series: load_hourly_series(series)?,
                series_label: series.display().to_string(),
                storage: run_config.storage,
                output_root: out_dir.clone(),
                threads: resolve_threads(threads),
            };
            let result = run_sizing_batch(&batch)?;

            println!(
                "Sized {} volumes ({} ok, {} failed), manifest at {}",
                result.jobs.len(),
                result.success,
                result.failure,
                result.manifest_path.display()
            );
            for record in &result.jobs {
                match &record.summary {
                    Some(s) => println!(
                        "  {:>10.1} m³  missing {:>12.1} kWh  rejected {:>12.1} kWh",
                        record.volume_m3,
                        s.missing_wh / 1_000.0,
                        s.rejected_wh / 1_000.0
                    ),
                    None => println!(
                        "  {:>10.1} m³  failed: {}",
                        record.volume_m3,
                        record.error.as_deref().unwrap_or("unknown error")
                    ),
                }
            }
            if let Some(best) = &result.best_job {
                println!("Best job: {best}");
            }
            if result.success == 0 {
                anyhow::bail!("all {} sizing jobs failed", result.failure);
            }
            Ok(())
        }
    }
}

pub(crate) fn print_summary(summary: &StorageSummary) {
    println!("  Hours           : {}", summary.hours);
    println!(
        "  Charge/discharge: {}/{} h",
        summary.charge_hours, summary.discharge_hours
    );
    println!("  Charged         : {:.1} kWh", WattHours(summary.charged_wh).to_kwh());
    println!("  Delivered       : {:.1} kWh", WattHours(summary.delivered_wh).to_kwh());
    println!("  Heat loss       : {:.1} kWh", WattHours(summary.heat_loss_wh).to_kwh());
    println!("  Missing         : {:.1} kWh", WattHours(summary.missing_wh).to_kwh());
    println!("  Rejected        : {:.1} kWh", WattHours(summary.rejected_wh).to_kwh());
    println!("  Final temp      : {:.1}", Kelvin(summary.final_temp_k).to_celsius());
}
