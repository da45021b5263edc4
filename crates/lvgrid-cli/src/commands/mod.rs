pub mod config;
pub mod graph;
pub mod reduce;
pub mod render;
pub mod validate;

use std::path::Path;

use anyhow::Result;
use lvgrid_core::ImpedanceGraph;
use lvgrid_cosim::ServiceConfig;
use lvgrid_io::cables::medium_voltage_cables;
use lvgrid_io::{load_topology, Topology};

/// Topology plus the effective service configuration.
pub(crate) fn load_inputs(topology: &Path, config: Option<&Path>) -> Result<(Topology, ServiceConfig)> {
    let config = ServiceConfig::load_or_default(config)?;
    let topology = load_topology(topology)?;
    Ok((topology, config))
}

/// The medium-voltage impedance graph of `topology`.
pub(crate) fn mv_graph(topology: &Topology, config: &ServiceConfig) -> Result<ImpedanceGraph> {
    let records = medium_voltage_cables(topology, &config.lv_cable_marker)?;
    Ok(ImpedanceGraph::from_cables(&records)?)
}
