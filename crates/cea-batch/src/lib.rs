pub mod job;
pub mod manifest;
pub mod runner;

pub use job::{jobs_from_volumes, SizingJob, SizingRecord};
pub use manifest::{load_sizing_manifest, write_sizing_manifest, SizingManifest};
pub use runner::{run_sizing_batch, SizingBatchConfig, SizingBatchSummary};
