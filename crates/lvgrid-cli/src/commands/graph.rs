use std::fs;

use anyhow::{Context, Result};
use lvgrid_cli::cli::GraphCommands;
use lvgrid_core::graph_utils;

use super::{load_inputs, mv_graph};

pub fn handle(command: &GraphCommands) -> Result<()> {
    match command {
        GraphCommands::Stats { topology, config } => {
            let (topology_model, config) = load_inputs(topology, config.as_deref())?;
            let network = mv_graph(&topology_model, &config)?;
            let stats = graph_utils::graph_stats(&network)?;
            println!("Graph statistics for {}:", topology.display());
            println!("  Nodes         : {}", stats.node_count);
            println!("  Edges         : {}", stats.edge_count);
            println!("  Components    : {}", stats.connected_components);
            println!(
                "  Degree [min/avg/max]: {}/{:.2}/{}",
                stats.min_degree, stats.avg_degree, stats.max_degree
            );
            println!("  Density       : {:.4}", stats.density);
            println!("  Loops         : {}", stats.cyclomatic_number);
            println!(
                "  Radial        : {}",
                if graph_utils::is_radial(&network) { "yes" } else { "no" }
            );
            Ok(())
        }
        GraphCommands::Islands {
            topology,
            config,
            emit,
        } => {
            let (topology_model, config) = load_inputs(topology, config.as_deref())?;
            let network = mv_graph(&topology_model, &config)?;
            let analysis = graph_utils::find_islands(&network)?;
            for summary in &analysis.islands {
                println!(
                    "Island {}: {} node(s)",
                    summary.island_id, summary.node_count
                );
            }
            if *emit {
                println!("\nNode → Island assignments:");
                for assignment in &analysis.assignments {
                    println!(
                        "  idx {:>3}: {:<20} -> island {}",
                        assignment.node_index, assignment.label, assignment.island_id
                    );
                }
            }
            Ok(())
        }
        GraphCommands::Export {
            topology,
            config,
            format,
            out,
        } => {
            let (topology_model, config) = load_inputs(topology, config.as_deref())?;
            let network = mv_graph(&topology_model, &config)?;
            let dot = graph_utils::export_graph(&network, format)?;
            match out {
                Some(path) => {
                    fs::write(path, &dot)
                        .with_context(|| format!("writing graph export '{}'", path.display()))?;
                    println!("Graph exported to {}", path.display());
                }
                None => println!("{dot}"),
            }
            Ok(())
        }
    }
}
