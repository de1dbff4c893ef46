//! Catalog of installable line types.
//!
//! A layout stores one integer per candidate edge: `0` means no line, `k`
//! selects the catalog entry with `index == k`. Entries are ordered by
//! current rating so that "one size up/down" is `k ± 1`.

use crate::diagnostics::{Diagnostics, Subject};
use crate::error::{CeaError, CeaResult};
use crate::units::Amperes;
use serde::{Deserialize, Serialize};

/// Copper resistivity in Ω·mm²/m, used when the catalog gives no resistance.
pub const COPPER_RESISTIVITY: f64 = 0.0172;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineType {
    /// 1-based gene value
    pub index: usize,
    pub name: String,
    pub current_rating: Amperes,
    /// Installation price per meter of trench (CHF/m)
    pub price_per_m: f64,
    pub lifetime_years: u32,
    /// Yearly O&M cost as a fraction of the annualized investment
    pub om_factor: f64,
    pub cross_section_mm2: f64,
    /// Resistance of a single conductor (Ω/km)
    pub resistance_ohm_per_km: f64,
}

impl LineType {
    pub fn new(
        index: usize,
        name: impl Into<String>,
        current_rating_a: f64,
        price_per_m: f64,
        lifetime_years: u32,
        om_factor: f64,
        cross_section_mm2: f64,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            current_rating: Amperes(current_rating_a),
            price_per_m,
            lifetime_years,
            om_factor,
            cross_section_mm2,
            resistance_ohm_per_km: copper_resistance_ohm_per_km(cross_section_mm2),
        }
    }

    pub fn with_resistance(mut self, ohm_per_km: f64) -> Self {
        self.resistance_ohm_per_km = ohm_per_km;
        self
    }

    /// Resistance of one conductor over `length_m` meters (Ω).
    pub fn resistance_ohm(&self, length_m: f64) -> f64 {
        self.resistance_ohm_per_km * length_m / 1_000.0
    }
}

/// Resistance per km of a copper conductor with the given cross-section.
pub fn copper_resistance_ohm_per_km(cross_section_mm2: f64) -> f64 {
    if cross_section_mm2 <= 0.0 {
        f64::INFINITY
    } else {
        COPPER_RESISTIVITY / cross_section_mm2 * 1_000.0
    }
}

/// Read-only line catalog shared by all workers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineCatalog {
    types: Vec<LineType>,
}

impl LineCatalog {
    /// Build a catalog, rejecting data that would break gene decoding.
    pub fn new(types: Vec<LineType>) -> CeaResult<Self> {
        let catalog = Self { types };
        let mut diag = Diagnostics::new();
        catalog.validate_into(&mut diag);
        if let Some(first) = diag.errors().next() {
            return Err(CeaError::Validation(format!("line catalog: {first}")));
        }
        Ok(catalog)
    }

    pub fn validate_into(&self, diag: &mut Diagnostics) {
        if self.types.is_empty() {
            diag.error(Subject::Catalog, "Line catalog is empty");
            return;
        }
        for (position, line) in self.types.iter().enumerate() {
            let subject = Subject::LineType(line.index);
            if line.index != position + 1 {
                diag.error(
                    subject,
                    format!("Expected index {} (indices must run 1..=n)", position + 1),
                );
            }
            if line.current_rating.value() <= 0.0 {
                diag.error(subject, "Non-positive current rating");
            }
            if line.price_per_m < 0.0 {
                diag.error(subject, "Negative price per meter");
            }
            if line.lifetime_years == 0 {
                diag.error(subject, "Lifetime must be at least one year");
            }
            if line.om_factor < 0.0 {
                diag.error(subject, "Negative O&M factor");
            }
            if !line.resistance_ohm_per_km.is_finite() || line.resistance_ohm_per_km < 0.0 {
                diag.error(subject, "Invalid conductor resistance");
            }
        }
        for pair in self.types.windows(2) {
            if pair[1].current_rating < pair[0].current_rating {
                diag.warning(
                    Subject::LineType(pair[1].index),
                    "Ratings are not sorted ascending; size steps may not increase capacity",
                );
            }
        }
    }

    /// Number of line types (the largest valid gene value).
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Decode a gene value. `0` and out-of-range values decode to `None`.
    pub fn get(&self, gene: usize) -> Option<&LineType> {
        gene.checked_sub(1).and_then(|i| self.types.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineType> {
        self.types.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> LineCatalog {
        LineCatalog::new(vec![
            LineType::new(1, "NAYY 4x50", 142.0, 10.0, 25, 0.02, 50.0),
            LineType::new(2, "NAYY 4x150", 270.0, 18.0, 25, 0.02, 150.0),
        ])
        .unwrap()
    }

    #[test]
    fn gene_zero_is_no_line() {
        let catalog = catalog();
        assert!(catalog.get(0).is_none());
        assert_eq!(catalog.get(2).unwrap().name, "NAYY 4x150");
        assert!(catalog.get(3).is_none());
    }

    #[test]
    fn copper_resistance_default() {
        let line = LineType::new(1, "Cu 50", 100.0, 1.0, 20, 0.0, 50.0);
        assert!((line.resistance_ohm_per_km - 0.344).abs() < 1e-9);
        assert!((line.resistance_ohm(500.0) - 0.172).abs() < 1e-9);
    }

    #[test]
    fn rejects_gapped_indices() {
        let err = LineCatalog::new(vec![LineType::new(2, "x", 10.0, 1.0, 20, 0.0, 10.0)]);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_empty_catalog() {
        assert!(LineCatalog::new(Vec::new()).is_err());
    }
}
