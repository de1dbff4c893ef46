//! `cea network` commands

use anyhow::{Context, Result};
use cea_algo::topology::GenerationStats;
use cea_algo::{initial_network, CostBreakdown, TopologyOptimizer};
use cea_cli::cli::NetworkCommands;
use cea_core::{find_islands, graph_stats};
use cea_io::importers::{load_line_catalog, load_street_network};
use cea_io::{load_config_or_default, write_json, write_layout_csv};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use crate::commands::util::resolve_threads;

#[derive(Debug, Serialize)]
struct OptimizeSummary<'a> {
    genes: &'a [usize],
    installed_lines: usize,
    power_loss_kw: f64,
    cost: &'a CostBreakdown,
    history: &'a [GenerationStats],
}

pub fn handle(command: &NetworkCommands) -> Result<()> {
    match command {
        NetworkCommands::Optimize {
            nodes,
            streets,
            catalog,
            config,
            out,
            summary,
            seed,
            threads,
        } => {
            let mut run_config = load_config_or_default(config.as_deref())?;
            if let Some(seed) = seed {
                run_config.genetic.seed = *seed;
            }
            if let Some(threads) = threads {
                run_config.genetic.threads = resolve_threads(threads);
            }

            let import = load_street_network(nodes, streets)?;
            for issue in &import.diagnostics.issues {
                warn!("{issue}");
            }
            let catalog = load_line_catalog(catalog)?;
            let network = initial_network(&import.network).context("building candidate lines")?;

            let optimizer =
                TopologyOptimizer::new(&run_config).context("configuring topology optimizer")?;
            info!(
                candidates = network.edge_count(),
                demand_kw = network.total_demand_kw(),
                threads = optimizer.threads(),
                "starting layout optimization"
            );
            let outcome = optimizer.run(&network, &catalog)?;
            let rows = write_layout_csv(
                out,
                &network,
                &catalog,
                &outcome.best.genes,
                &outcome.load_flow,
            )?;

            println!("Optimized layout written to {}", out.display());
            println!("  Installed lines : {rows}");
            println!("  Investment      : {:.2} CHF/yr", outcome.cost.investment);
            println!("  O&M             : {:.2} CHF/yr", outcome.cost.operation_maintenance);
            println!("  Losses          : {:.2} CHF/yr", outcome.cost.losses);
            println!("  Total cost      : {:.2} CHF/yr", outcome.cost.total);

            if let Some(path) = summary {
                write_json(
                    path,
                    &OptimizeSummary {
                        genes: &outcome.best.genes,
                        installed_lines: rows,
                        power_loss_kw: outcome.load_flow.power_loss_kw,
                        cost: &outcome.cost,
                        history: &outcome.history,
                    },
                )?;
            }
            Ok(())
        }
        NetworkCommands::Candidates { nodes, streets } => handle_candidates(nodes, streets),
    }
}

fn handle_candidates(nodes: &Path, streets: &Path) -> Result<()> {
    let import = load_street_network(nodes, streets)?;
    let stats = import.network.stats();
    let graph = graph_stats(&import.network);
    let islands = find_islands(&import.network);
    let network = initial_network(&import.network).context("building candidate lines")?;
    let lengths: Vec<f64> = network.edges.iter().map(|e| e.length.value()).collect();
    let shortest = lengths.iter().copied().fold(f64::INFINITY, f64::min);
    let longest = lengths.iter().copied().fold(0.0, f64::max);

    println!("Street network:");
    println!("  Plants          : {}", stats.num_plants);
    println!("  Consumers       : {}", stats.num_consumers);
    println!("  Junctions       : {}", stats.num_junctions);
    println!("  Segments        : {}", stats.num_segments);
    println!("  Peak demand     : {:.1} kW", stats.total_peak_demand_kw);
    println!("  Components      : {}", graph.connected_components);
    println!("  Degree [avg/max]: {:.2}/{}", graph.avg_degree, graph.max_degree);
    for (i, island) in islands.iter().enumerate().filter(|(_, i)| i.is_unsupplied()) {
        warn!(
            island = i,
            consumers = island.consumers,
            "street island without a plant"
        );
    }
    println!("Candidate lines:");
    println!("  Edges           : {}", network.edge_count());
    if !lengths.is_empty() {
        println!("  Length [min/max]: {shortest:.1}/{longest:.1} m");
    }
    println!("Diagnostics: {}", import.diagnostics.summary());
    Ok(())
}
