use crate::config::StorageConfig;
use cea_core::{CeaError, CeaResult};
use serde::Serialize;
use std::f64::consts::PI;

/// Seconds per hour, converts J/K to Wh/K.
const J_PER_WH: f64 = 3_600.0;

/// Cylindrical storage tank with diameter = 3 × height.
///
/// Content is measured from `t_min`: `content = (T − t_min) · capacity`, so
/// content ≥ 0 exactly when T ≥ t_min.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageTank {
    pub volume_m3: f64,
    pub height_m: f64,
    pub diameter_m: f64,
    pub area_top_m2: f64,
    pub area_side_m2: f64,
    /// Heat capacity of the fill (Wh/K)
    pub capacity_wh_per_k: f64,
    pub t_min_k: f64,
    pub t_max_k: f64,
    pub alpha_loss_w_per_m2_k: f64,
    pub ground_temp_k: f64,
}

impl StorageTank {
    pub fn new(volume_m3: f64, config: &StorageConfig) -> CeaResult<Self> {
        if !volume_m3.is_finite() || volume_m3 <= 0.0 {
            return Err(CeaError::Validation(format!(
                "storage volume must be positive, got {volume_m3}"
            )));
        }
        config.validate()?;

        // V = π d²/4 · h with d = 3h  ⇒  h = (4V / 9π)^(1/3)
        let height_m = (4.0 * volume_m3 / (9.0 * PI)).cbrt();
        let diameter_m = 3.0 * height_m;
        Ok(Self {
            volume_m3,
            height_m,
            diameter_m,
            area_top_m2: PI * diameter_m * diameter_m / 4.0,
            area_side_m2: PI * diameter_m * height_m,
            capacity_wh_per_k: volume_m3 * config.density_kg_per_m3 * config.cp_j_per_kg_k
                / J_PER_WH,
            t_min_k: config.t_min_k,
            t_max_k: config.t_max_k,
            alpha_loss_w_per_m2_k: config.alpha_loss_w_per_m2_k,
            ground_temp_k: config.ground_temp_k,
        })
    }

    pub fn content_at(&self, temp_k: f64) -> f64 {
        (temp_k - self.t_min_k) * self.capacity_wh_per_k
    }

    pub fn temperature_of(&self, content_wh: f64) -> f64 {
        self.t_min_k + content_wh / self.capacity_wh_per_k
    }

    /// Content at `t_max`, the charging cap.
    pub fn max_content(&self) -> f64 {
        self.content_at(self.t_max_k)
    }

    /// Envelope loss over one hour (Wh): lid to ambient air, wall to ground.
    pub fn heat_loss_wh(&self, temp_k: f64, ambient_k: f64) -> f64 {
        self.alpha_loss_w_per_m2_k
            * (self.area_top_m2 * (temp_k - ambient_k)
                + self.area_side_m2 * (temp_k - self.ground_temp_k))
    }
}
