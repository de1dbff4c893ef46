use crate::job::{SizingJob, SizingRecord};
use crate::manifest::{write_sizing_manifest, SizingManifest};
use anyhow::{Context, Result};
use cea_algo::{simulate_storage, StorageConfig, StorageSummary, StorageTank};
use cea_core::HourlyRecord;
use cea_io::write_storage_csv;
use chrono::Utc;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// Inputs of a storage sizing sweep: one simulation per candidate volume.
pub struct SizingBatchConfig {
    pub jobs: Vec<SizingJob>,
    pub series: Vec<HourlyRecord>,
    /// Name of the series recorded in the manifest
    pub series_label: String,
    pub storage: StorageConfig,
    pub output_root: PathBuf,
    pub threads: usize,
}

pub struct SizingBatchSummary {
    pub success: usize,
    pub failure: usize,
    pub best_job: Option<String>,
    pub manifest_path: PathBuf,
    pub jobs: Vec<SizingRecord>,
}

pub fn run_sizing_batch(config: &SizingBatchConfig) -> Result<SizingBatchSummary> {
    fs::create_dir_all(&config.output_root).with_context(|| {
        format!(
            "creating batch output root '{}'",
            config.output_root.display()
        )
    })?;
    config.storage.validate().context("validating storage config")?;

    let thread_count = if config.threads == 0 {
        num_cpus::get()
    } else {
        config.threads
    };
    let pool = ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .context("building Rayon thread pool for sizing runs")?;

    // Jobs share only the read-only series and config
    let records: Vec<SizingRecord> = pool.install(|| {
        config
            .jobs
            .par_iter()
            .map(|job| run_job(job, config))
            .collect()
    });

    let success = records.iter().filter(|record| record.is_ok()).count();
    let failure = records.len() - success;
    let best_job = best_record(&records).map(|r| r.job_id.clone());

    let manifest = SizingManifest {
        created_at: Utc::now(),
        series: config.series_label.clone(),
        hours: config.series.len(),
        num_jobs: records.len(),
        success,
        failure,
        best_job: best_job.clone(),
        jobs: records.clone(),
    };
    let manifest_path = config.output_root.join("sizing_manifest.json");
    write_sizing_manifest(&manifest_path, &manifest)?;

    info!(
        jobs = records.len(),
        success,
        failure,
        best = best_job.as_deref().unwrap_or("none"),
        "storage sizing batch complete"
    );
    Ok(SizingBatchSummary {
        success,
        failure,
        best_job,
        manifest_path,
        jobs: records,
    })
}

/// Least missing energy, then the smaller tank.
fn best_record(records: &[SizingRecord]) -> Option<&SizingRecord> {
    records
        .iter()
        .filter_map(|r| r.summary.as_ref().map(|s| (r, s.missing_wh)))
        .min_by(|(a, ma), (b, mb)| {
            ma.total_cmp(mb)
                .then_with(|| a.volume_m3.total_cmp(&b.volume_m3))
        })
        .map(|(r, _)| r)
}

fn run_job(job: &SizingJob, config: &SizingBatchConfig) -> SizingRecord {
    let job_dir = config.output_root.join(&job.job_id);
    let output_file = job_dir.join("storage.csv");

    let runner = || -> Result<StorageSummary> {
        let tank = StorageTank::new(job.volume_m3, &config.storage)?;
        let simulation = simulate_storage(&config.series, &tank, &config.storage)?;
        fs::create_dir_all(&job_dir)
            .with_context(|| format!("creating job directory '{}'", job_dir.display()))?;
        write_storage_csv(&output_file, &simulation)?;
        Ok(simulation.summary)
    };

    let (status, error, summary) = match runner() {
        Ok(summary) => ("ok".to_string(), None, Some(summary)),
        Err(err) => {
            warn!(job = %job.job_id, "sizing job failed: {err:#}");
            ("error".to_string(), Some(format!("{err:#}")), None)
        }
    };
    SizingRecord {
        job_id: job.job_id.clone(),
        volume_m3: job.volume_m3,
        status,
        error,
        output: output_file.display().to_string(),
        summary,
    }
}
