use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::job::SizingRecord;

#[derive(Debug, Serialize, Deserialize)]
pub struct SizingManifest {
    pub created_at: DateTime<Utc>,
    /// Hourly series the jobs were run on
    pub series: String,
    pub hours: usize,
    pub num_jobs: usize,
    pub success: usize,
    pub failure: usize,
    /// Successful job with the least missing energy
    pub best_job: Option<String>,
    pub jobs: Vec<SizingRecord>,
}

pub fn write_sizing_manifest(path: &Path, manifest: &SizingManifest) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating manifest directory '{}'", parent.display()))?;
    }
    let json =
        serde_json::to_string_pretty(manifest).context("serializing sizing manifest to JSON")?;
    fs::write(path, json)
        .with_context(|| format!("writing sizing manifest '{}'", path.display()))?;
    Ok(())
}

pub fn load_sizing_manifest(path: &Path) -> Result<SizingManifest> {
    let file = fs::File::open(path)
        .with_context(|| format!("opening sizing manifest '{}'", path.display()))?;
    serde_json::from_reader(file)
        .with_context(|| format!("parsing sizing manifest '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn manifest_writes_and_reads_back() {
        let record = SizingRecord {
            job_id: "storage-00-10m3".into(),
            volume_m3: 10.0,
            status: "error".into(),
            error: Some("volume must be positive".into()),
            output: "out/storage-00-10m3/storage.csv".into(),
            summary: None,
        };
        let manifest = SizingManifest {
            created_at: Utc::now(),
            series: "hourly.csv".into(),
            hours: 8_760,
            num_jobs: 1,
            success: 0,
            failure: 1,
            best_job: None,
            jobs: vec![record.clone()],
        };
        let tmp = NamedTempFile::new().unwrap();
        write_sizing_manifest(tmp.path(), &manifest).unwrap();
        let parsed = load_sizing_manifest(tmp.path()).unwrap();
        assert_eq!(parsed.series, "hourly.csv");
        assert_eq!(parsed.jobs.first().unwrap().job_id, record.job_id);
        assert!(!parsed.jobs[0].is_ok());
    }
}
