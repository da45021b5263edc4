use std::path::Path;

use anyhow::{anyhow, Result};
use lvgrid_algo::select_cut;
use lvgrid_core::{is_radial, GridError};
use lvgrid_io::topology::ensure_valid;
use tracing::info;

use super::{load_inputs, mv_graph};

pub fn handle(
    topology_path: &Path,
    source: Option<&str>,
    config_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let (topology, config) = load_inputs(topology_path, config_path)?;
    ensure_valid(&topology, &config.lv_cable_marker)?;
    let source = source
        .map(str::to_string)
        .or_else(|| config.source_bus.clone())
        .or_else(|| topology.source_bus())
        .ok_or_else(|| anyhow!("no source bus: pass --source or add an import to the topology"))?;

    let graph = mv_graph(&topology, &config)?;
    let radial = graph.contains_bus(&source) && is_radial(&graph);
    let cut = if radial {
        info!(source = source.as_str(), "medium-voltage network is already radial");
        None
    } else {
        select_cut(&graph, &source).map_err(GridError::from)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&cut)?);
        return Ok(());
    }
    match cut {
        Some(cut) => {
            println!("Radial reduction for {}:", topology_path.display());
            println!("  Source bus    : {source}");
            println!("  Farthest bus  : {} ({:.4} Ω)", cut.from_bus, cut.distance);
            println!("  Neighbour bus : {}", cut.to_bus);
            println!("  Cable removed : {}", cut.cable);
        }
        None if radial => println!("network is already radial; no cut required"),
        None => println!("no cut required"),
    }
    Ok(())
}
