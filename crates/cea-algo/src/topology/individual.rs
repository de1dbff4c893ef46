use super::problem::CandidateNetwork;
use cea_core::LineCatalog;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One candidate layout: a line type per candidate edge (`0` = no line).
///
/// `fitness` is `None` until the layout has been evaluated; any change to
/// `genes` must reset it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub genes: Vec<usize>,
    pub fitness: Option<f64>,
}

impl Individual {
    pub fn new(genes: Vec<usize>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    /// Fitness for ranking; unevaluated layouts rank last.
    pub fn score(&self) -> f64 {
        self.fitness.unwrap_or(f64::INFINITY)
    }

    pub fn is_feasible(&self) -> bool {
        self.fitness.is_some_and(f64::is_finite)
    }

    pub fn active_count(&self) -> usize {
        self.genes.iter().filter(|&&g| g != 0).count()
    }

    pub fn invalidate(&mut self) {
        self.fitness = None;
    }
}

/// Draw a random layout, each gene uniform in `0..=catalog.len()`.
pub fn generate_individual<R: Rng + ?Sized>(
    network: &CandidateNetwork,
    catalog: &LineCatalog,
    rng: &mut R,
) -> Individual {
    let genes = (0..network.edge_count())
        .map(|_| rng.gen_range(0..=catalog.len()))
        .collect();
    Individual::new(genes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::test_support::{catalog, star_network};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn genes_stay_in_catalog_range() {
        let network = star_network();
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let ind = generate_individual(&network, &catalog, &mut rng);
            assert_eq!(ind.genes.len(), network.edge_count());
            assert!(ind.genes.iter().all(|&g| g <= catalog.len()));
            assert!(ind.fitness.is_none());
        }
    }

    #[test]
    fn unevaluated_ranks_last() {
        let mut ind = Individual::new(vec![1, 0]);
        assert_eq!(ind.score(), f64::INFINITY);
        ind.fitness = Some(12.0);
        assert!(ind.is_feasible());
        ind.invalidate();
        assert!(!ind.is_feasible());
    }
}
