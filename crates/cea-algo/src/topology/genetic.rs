//! Genetic-algorithm driver.
//!
//! Each generation evaluates all unevaluated layouts on a persistent rayon
//! pool (the `collect` is the barrier), refreshes the hall of fame, then
//! breeds the next population sequentially:
//!
//! ```text
//! population ──eval (parallel)──► hall of fame = best k of (population ∪ hall)
//!            ──tournament (P−k)──► uniform crossover ──► uniform-int mutation
//!            ──► offspring ∪ hall of fame = next population
//! ```
//!
//! Worker RNGs are seeded from `(seed, generation, index)`, so a run is
//! reproducible for a fixed seed whatever the thread count.

use super::fitness::{evaluate_individual, CostBreakdown};
use super::individual::{generate_individual, Individual};
use super::problem::CandidateNetwork;
use super::worker::{evaluate_layout, EvaluationContext};
use crate::config::{CeaConfig, GeneticConfig, PlanningConfig};
use crate::power_flow::{LoadFlowResult, PowerFlowSolver, RadialSweepSolver};
use cea_core::{CeaError, CeaResult, LineCatalog};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Serialize;
use std::collections::HashSet;
use tracing::info;

/// Per-generation progress record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationStats {
    pub generation: usize,
    /// Best fitness seen so far (hall of fame head)
    pub best_fitness: f64,
    /// Mean over feasible individuals of this generation
    pub mean_feasible_fitness: Option<f64>,
    pub feasible_count: usize,
    /// Individuals evaluated in this generation
    pub evaluated: usize,
}

#[derive(Debug, Clone)]
pub struct OptimizationOutcome {
    pub best: Individual,
    pub cost: CostBreakdown,
    pub history: Vec<GenerationStats>,
    /// Load flow of the best layout
    pub load_flow: LoadFlowResult,
    /// Evaluated population of the last generation
    pub population: Vec<Individual>,
}

pub struct TopologyOptimizer {
    planning: PlanningConfig,
    genetic: GeneticConfig,
    solver: Box<dyn PowerFlowSolver>,
    pool: ThreadPool,
}

impl TopologyOptimizer {
    /// Validate the configuration and start the worker pool.
    pub fn new(config: &CeaConfig) -> CeaResult<Self> {
        config.planning.validate()?;
        config.genetic.validate()?;

        // threads=0 means one worker per core
        let thread_count = if config.genetic.threads == 0 {
            num_cpus::get()
        } else {
            config.genetic.threads
        };
        let pool = ThreadPoolBuilder::new()
            .num_threads(thread_count)
            .build()
            .map_err(|e| CeaError::Config(format!("building evaluation thread pool: {e}")))?;

        Ok(Self {
            planning: config.planning.clone(),
            genetic: config.genetic.clone(),
            solver: Box::new(RadialSweepSolver::from_config(&config.planning)),
            pool,
        })
    }

    /// Replace the default radial sweep oracle.
    pub fn with_solver(mut self, solver: impl PowerFlowSolver + 'static) -> Self {
        self.solver = Box::new(solver);
        self
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn run(
        &self,
        network: &CandidateNetwork,
        catalog: &LineCatalog,
    ) -> CeaResult<OptimizationOutcome> {
        if catalog.is_empty() {
            return Err(CeaError::Validation("line catalog is empty".into()));
        }
        let ctx = EvaluationContext {
            network,
            catalog,
            config: &self.planning,
            solver: self.solver.as_ref(),
        };
        let genetic = &self.genetic;
        let elite = genetic.elite_size();
        let mut rng = StdRng::seed_from_u64(genetic.seed);

        let mut population: Vec<Individual> = (0..genetic.population_size)
            .map(|_| generate_individual(network, catalog, &mut rng))
            .collect();
        let mut hall_of_fame: Vec<Individual> = Vec::new();
        let mut history = Vec::with_capacity(genetic.generations);

        let generations = genetic.generations.max(1);
        for generation in 0..generations {
            let evaluated = self.evaluate_population(&mut population, generation, ctx);
            hall_of_fame = update_hall_of_fame(&population, &hall_of_fame, elite);

            let stats = generation_stats(generation, &population, &hall_of_fame, evaluated);
            info!(
                generation,
                best = stats.best_fitness,
                mean_feasible = stats.mean_feasible_fitness.unwrap_or(f64::NAN),
                feasible = stats.feasible_count,
                evaluated,
                "generation complete"
            );
            history.push(stats);

            if generation + 1 == generations {
                break;
            }
            let mut offspring = tournament_selection(
                &population,
                genetic.population_size.saturating_sub(hall_of_fame.len()),
                genetic.tournament_size,
                &mut rng,
            );
            crossover_population(&mut offspring, genetic, &mut rng);
            mutate_population(&mut offspring, catalog.len(), genetic, &mut rng);
            offspring.extend(hall_of_fame.iter().cloned());
            population = offspring;
        }

        let best = hall_of_fame
            .first()
            .cloned()
            .ok_or_else(|| CeaError::Other("genetic search produced no individual".into()))?;
        let load_flow = self.solver.solve(network, catalog, &best.genes);
        let cost = evaluate_individual(
            &best,
            network,
            load_flow.fitness_loss_kw(),
            catalog,
            &self.planning,
        );
        if !cost.is_feasible() {
            return Err(CeaError::Network(format!(
                "no feasible layout after {generations} generations ({} line violations)",
                load_flow.violations().len()
            )));
        }

        Ok(OptimizationOutcome {
            best,
            cost,
            history,
            load_flow,
            population,
        })
    }

    /// Evaluate every individual without a fitness; returns how many ran.
    fn evaluate_population(
        &self,
        population: &mut [Individual],
        generation: usize,
        ctx: EvaluationContext<'_>,
    ) -> usize {
        let seed = self.genetic.seed;
        let pending: Vec<usize> = population
            .iter()
            .enumerate()
            .filter(|(_, ind)| ind.fitness.is_none())
            .map(|(i, _)| i)
            .collect();

        let snapshot: &[Individual] = population;
        let results: Vec<(usize, Individual)> = self.pool.install(|| {
            pending
                .par_iter()
                .map(|&index| {
                    let mut rng = StdRng::seed_from_u64(worker_seed(seed, generation, index));
                    let evaluation = evaluate_layout(index, &snapshot[index], ctx, &mut rng);
                    (index, evaluation.individual)
                })
                .collect()
        });

        let evaluated = results.len();
        for (index, individual) in results {
            population[index] = individual;
        }
        evaluated
    }
}

/// SplitMix64 mix of the run seed with generation and index.
fn worker_seed(seed: u64, generation: usize, index: usize) -> u64 {
    let mut z = seed
        ^ (generation as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (index as u64).wrapping_mul(0xD1B5_4A32_D192_ED03);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Best `size` distinct layouts of `population ∪ previous`, as owned copies.
fn update_hall_of_fame(
    population: &[Individual],
    previous: &[Individual],
    size: usize,
) -> Vec<Individual> {
    let mut candidates: Vec<&Individual> = population
        .iter()
        .chain(previous.iter())
        .filter(|ind| ind.fitness.is_some())
        .collect();
    candidates.sort_by(|a, b| a.score().total_cmp(&b.score()));

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|ind| seen.insert(ind.genes.clone()))
        .take(size)
        .cloned()
        .collect()
}

fn generation_stats(
    generation: usize,
    population: &[Individual],
    hall_of_fame: &[Individual],
    evaluated: usize,
) -> GenerationStats {
    let feasible: Vec<f64> = population
        .iter()
        .filter(|ind| ind.is_feasible())
        .map(Individual::score)
        .collect();
    let mean_feasible_fitness = if feasible.is_empty() {
        None
    } else {
        Some(feasible.iter().sum::<f64>() / feasible.len() as f64)
    };
    GenerationStats {
        generation,
        best_fitness: hall_of_fame.first().map_or(f64::INFINITY, Individual::score),
        mean_feasible_fitness,
        feasible_count: feasible.len(),
        evaluated,
    }
}

/// Pick `count` copies, each the fittest of `tournament_size` random draws.
pub fn tournament_selection<R: Rng + ?Sized>(
    population: &[Individual],
    count: usize,
    tournament_size: usize,
    rng: &mut R,
) -> Vec<Individual> {
    if population.is_empty() {
        return Vec::new();
    }
    (0..count)
        .map(|_| {
            let mut winner = rng.gen_range(0..population.len());
            for _ in 1..tournament_size.max(1) {
                let challenger = rng.gen_range(0..population.len());
                if population[challenger].score() < population[winner].score() {
                    winner = challenger;
                }
            }
            population[winner].clone()
        })
        .collect()
}

/// Uniform crossover on consecutive pairs.
fn crossover_population<R: Rng + ?Sized>(
    offspring: &mut [Individual],
    genetic: &GeneticConfig,
    rng: &mut R,
) {
    for pair in offspring.chunks_exact_mut(2) {
        if rng.gen_bool(genetic.crossover_probability) {
            let (left, right) = pair.split_at_mut(1);
            uniform_crossover(&mut left[0], &mut right[0], genetic.gene_probability, rng);
        }
    }
}

/// Swap each gene position with probability `gene_probability`.
pub fn uniform_crossover<R: Rng + ?Sized>(
    a: &mut Individual,
    b: &mut Individual,
    gene_probability: f64,
    rng: &mut R,
) {
    for (x, y) in a.genes.iter_mut().zip(b.genes.iter_mut()) {
        if rng.gen_bool(gene_probability) {
            std::mem::swap(x, y);
        }
    }
    a.invalidate();
    b.invalidate();
}

fn mutate_population<R: Rng + ?Sized>(
    offspring: &mut [Individual],
    max_gene: usize,
    genetic: &GeneticConfig,
    rng: &mut R,
) {
    for individual in offspring.iter_mut() {
        if rng.gen_bool(genetic.mutation_probability) {
            mutate_uniform(individual, max_gene, genetic.gene_probability, rng);
        }
    }
}

/// Redraw each gene uniformly in `0..=max_gene` with probability `gene_probability`.
pub fn mutate_uniform<R: Rng + ?Sized>(
    individual: &mut Individual,
    max_gene: usize,
    gene_probability: f64,
    rng: &mut R,
) {
    for gene in individual.genes.iter_mut() {
        if rng.gen_bool(gene_probability) {
            *gene = rng.gen_range(0..=max_gene);
        }
    }
    individual.invalidate();
}
