use cea_algo::StorageSummary;
use serde::{Deserialize, Serialize};

/// One candidate storage volume.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingJob {
    pub job_id: String,
    pub volume_m3: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizingRecord {
    pub job_id: String,
    pub volume_m3: f64,
    pub status: String,
    pub error: Option<String>,
    pub output: String,
    pub summary: Option<StorageSummary>,
}

impl SizingRecord {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Jobs in the given order; ids keep the position so repeated volumes stay distinct.
pub fn jobs_from_volumes(volumes: &[f64]) -> Vec<SizingJob> {
    volumes
        .iter()
        .enumerate()
        .map(|(i, &volume_m3)| SizingJob {
            job_id: format!("storage-{i:02}-{volume_m3}m3"),
            volume_m3,
        })
        .collect()
}
