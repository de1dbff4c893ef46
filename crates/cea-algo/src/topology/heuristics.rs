//! Line sizing edits applied between two load-flow solves.
//!
//! All passes read the loading of the *previous* solve and edit genes in
//! place. They may disconnect consumers; the worker repairs afterwards.

use crate::config::PlanningConfig;
use crate::power_flow::LoadFlowResult;
use cea_core::LineCatalog;
use rand::Rng;

/// Remove every active line whose loading is at or below the zero-load tolerance.
///
/// This also drops lines closing loops, which carry no current in the radial sweep.
pub fn delete_line_hard(
    genes: &mut [usize],
    flow: &LoadFlowResult,
    config: &PlanningConfig,
) -> usize {
    let mut removed = 0;
    for (gene, &loading) in genes.iter_mut().zip(flow.edge_loading.iter()) {
        if *gene != 0 && loading <= config.zero_load_tolerance {
            *gene = 0;
            removed += 1;
        }
    }
    removed
}

/// Remove lightly loaded lines, each with probability `soft_delete_probability`.
pub fn delete_line_soft<R: Rng + ?Sized>(
    genes: &mut [usize],
    flow: &LoadFlowResult,
    config: &PlanningConfig,
    rng: &mut R,
) -> usize {
    let probability = config.soft_delete_probability.clamp(0.0, 1.0);
    let mut removed = 0;
    for (gene, &loading) in genes.iter_mut().zip(flow.edge_loading.iter()) {
        if *gene != 0 && loading < config.soft_delete_threshold && rng.gen_bool(probability) {
            *gene = 0;
            removed += 1;
        }
    }
    removed
}

/// Step lines loaded above `overload_threshold` up one catalog size.
pub fn reinforce_lines(
    genes: &mut [usize],
    flow: &LoadFlowResult,
    catalog: &LineCatalog,
    config: &PlanningConfig,
) -> usize {
    let mut changed = 0;
    for (gene, &loading) in genes.iter_mut().zip(flow.edge_loading.iter()) {
        if *gene != 0 && *gene < catalog.len() && loading > config.overload_threshold {
            *gene += 1;
            changed += 1;
        }
    }
    changed
}

/// Step lines loaded below `underload_threshold` down one size, never below
/// the smallest type and only if the smaller line stays under the
/// overload threshold at the current flow.
pub fn downsize_lines(
    genes: &mut [usize],
    flow: &LoadFlowResult,
    catalog: &LineCatalog,
    config: &PlanningConfig,
) -> usize {
    let mut changed = 0;
    for (edge, gene) in genes.iter_mut().enumerate() {
        let loading = flow.edge_loading.get(edge).copied().unwrap_or(0.0);
        if *gene <= 1 || loading >= config.underload_threshold {
            continue;
        }
        let Some(smaller) = catalog.get(*gene - 1) else {
            continue;
        };
        let current = flow.edge_current_a.get(edge).copied().unwrap_or(0.0);
        if current / smaller.current_rating.value() <= config.overload_threshold {
            *gene -= 1;
            changed += 1;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::power_flow::LoadFlowStatus;
    use crate::topology::test_support::catalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn flow(currents: &[f64], ratings: &[f64]) -> LoadFlowResult {
        LoadFlowResult {
            status: LoadFlowStatus::Feasible,
            edge_current_a: currents.to_vec(),
            edge_loading: currents
                .iter()
                .zip(ratings)
                .map(|(i, r)| if *r > 0.0 { i / r } else { 0.0 })
                .collect(),
            edge_loss_kw: vec![0.0; currents.len()],
            node_voltage_v: Vec::new(),
            power_loss_kw: 0.0,
            iterations: 1,
        }
    }

    #[test]
    fn hard_delete_drops_unloaded_lines() {
        let mut genes = vec![1, 2, 0, 1];
        let f = flow(&[10.0, 0.0, 0.0, 0.0], &[50.0, 150.0, 0.0, 50.0]);
        assert_eq!(delete_line_hard(&mut genes, &f, &PlanningConfig::default()), 2);
        assert_eq!(genes, vec![1, 0, 0, 0]);
    }

    #[test]
    fn soft_delete_respects_probability_bounds() {
        let f = flow(&[1.0, 40.0], &[50.0, 50.0]);
        let never = PlanningConfig {
            soft_delete_probability: 0.0,
            ..PlanningConfig::default()
        };
        let always = PlanningConfig {
            soft_delete_probability: 1.0,
            ..PlanningConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(0);

        let mut genes = vec![1, 1];
        assert_eq!(delete_line_soft(&mut genes, &f, &never, &mut rng), 0);
        assert_eq!(delete_line_soft(&mut genes, &f, &always, &mut rng), 1);
        assert_eq!(genes, vec![0, 1]);
    }

    #[test]
    fn reinforce_stops_at_largest_type() {
        let catalog = catalog();
        let mut genes = vec![1, 2, 1];
        let f = flow(&[48.0, 149.0, 10.0], &[50.0, 150.0, 50.0]);
        assert_eq!(reinforce_lines(&mut genes, &f, &catalog, &PlanningConfig::default()), 1);
        assert_eq!(genes, vec![2, 2, 1]);
    }

    #[test]
    fn downsize_keeps_headroom() {
        let catalog = catalog();
        let mut genes = vec![2, 2, 1];
        // 30 A fits the 50 A type (0.6), 60 A would not (1.2)
        let f = flow(&[30.0, 60.0, 5.0], &[150.0, 150.0, 50.0]);
        assert_eq!(downsize_lines(&mut genes, &f, &catalog, &PlanningConfig::default()), 1);
        assert_eq!(genes, vec![1, 2, 1]);
    }
}
