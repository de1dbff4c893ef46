//! Per-individual evaluation, run in parallel across a population.
//!
//! ```text
//! repair → load flow → heuristics → repair → load flow → cost
//! ```

use super::fitness::{evaluate_individual, CostBreakdown};
use super::heuristics::{delete_line_hard, delete_line_soft, downsize_lines, reinforce_lines};
use super::individual::Individual;
use super::problem::CandidateNetwork;
use super::repair::process_individual_network;
use crate::config::PlanningConfig;
use crate::power_flow::{LoadFlowResult, PowerFlowSolver};
use cea_core::LineCatalog;
use rand::Rng;
use tracing::debug;

/// Read-only inputs shared by every worker.
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub network: &'a CandidateNetwork,
    pub catalog: &'a LineCatalog,
    pub config: &'a PlanningConfig,
    pub solver: &'a dyn PowerFlowSolver,
}

#[derive(Debug, Clone)]
pub struct LayoutEvaluation {
    /// Repaired and resized layout with its fitness set
    pub individual: Individual,
    /// Peak loss of the final solve, `+inf` when infeasible
    pub power_loss_kw: f64,
    pub cost: CostBreakdown,
    pub load_flow: LoadFlowResult,
}

/// Repair, size and score one layout.
pub fn evaluate_layout<R: Rng + ?Sized>(
    index: usize,
    individual: &Individual,
    ctx: EvaluationContext<'_>,
    rng: &mut R,
) -> LayoutEvaluation {
    let mut repaired =
        process_individual_network(individual, ctx.network, ctx.catalog, ctx.config, rng);
    let first = ctx.solver.solve(ctx.network, ctx.catalog, &repaired.genes);

    let removed = delete_line_hard(&mut repaired.genes, &first, ctx.config)
        + delete_line_soft(&mut repaired.genes, &first, ctx.config, rng);
    let reinforced = reinforce_lines(&mut repaired.genes, &first, ctx.catalog, ctx.config);
    let downsized = downsize_lines(&mut repaired.genes, &first, ctx.catalog, ctx.config);

    let mut tuned =
        process_individual_network(&repaired, ctx.network, ctx.catalog, ctx.config, rng);
    let load_flow = ctx.solver.solve(ctx.network, ctx.catalog, &tuned.genes);
    let power_loss_kw = load_flow.fitness_loss_kw();
    let cost = evaluate_individual(&tuned, ctx.network, power_loss_kw, ctx.catalog, ctx.config);
    tuned.fitness = Some(cost.total);

    debug!(
        individual = index,
        removed,
        reinforced,
        downsized,
        lines = tuned.active_count(),
        feasible = load_flow.is_feasible(),
        fitness = cost.total,
        "evaluated layout"
    );

    LayoutEvaluation {
        individual: tuned,
        power_loss_kw,
        cost,
        load_flow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::power_flow::RadialSweepSolver;
    use crate::topology::repair::is_fully_supplied;
    use crate::topology::test_support::{catalog, star_network};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn full_layout_is_radialized_and_scored() {
        let network = star_network();
        let catalog = catalog();
        let config = PlanningConfig::default();
        let solver = RadialSweepSolver::from_config(&config);
        let ctx = EvaluationContext {
            network: &network,
            catalog: &catalog,
            config: &config,
            solver: &solver,
        };
        let mut rng = StdRng::seed_from_u64(11);
        let result = evaluate_layout(0, &Individual::new(vec![2, 2, 2]), ctx, &mut rng);

        assert!(is_fully_supplied(&result.individual.genes, &network));
        assert!(result.load_flow.is_feasible());
        // the loop-closing C1-C2 line carries nothing and is dropped
        assert_eq!(result.individual.genes[2], 0);
        assert_eq!(result.individual.fitness, Some(result.cost.total));
        assert!(result.cost.total.is_finite());
    }
}
