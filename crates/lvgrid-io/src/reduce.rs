//! Apply the radial reduction to a circuit script.

use anyhow::{anyhow, Result};
use lvgrid_algo::{select_cut, RadialCut};
use lvgrid_core::{is_radial, GridError, ImpedanceGraph};
use tracing::info;

use crate::cables::medium_voltage_cables;
use crate::dss::{CircuitScript, LineElement};
use crate::topology::Topology;

/// A cut that has been removed from the script.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedCut {
    pub cut: RadialCut,
    pub line: LineElement,
}

/// Build the medium-voltage graph of `topology`, choose the cable to open and
/// remove it from `script`.
///
/// Returns `Ok(None)` when there are no medium-voltage cables or the
/// medium-voltage graph is already radial. A source bus missing from a
/// non-empty graph is a configuration error. The selected cable is removed by
/// name, so parallel cables and low-voltage cables on the same buses stay.
pub fn radialize(
    topology: &Topology,
    script: &mut CircuitScript,
    source: &str,
    lv_marker: &str,
) -> Result<Option<AppliedCut>> {
    let records = medium_voltage_cables(topology, lv_marker)?;
    let graph = ImpedanceGraph::from_cables(&records)?;
    if graph.contains_bus(source) && is_radial(&graph) {
        info!(
            buses = graph.node_count(),
            cables = graph.edge_count(),
            "medium-voltage network is already radial; circuit left unchanged"
        );
        return Ok(None);
    }
    let Some(cut) = select_cut(&graph, source).map_err(GridError::from)? else {
        info!("no medium-voltage cables; circuit left unchanged");
        return Ok(None);
    };
    let line = script.remove_line(&cut.cable).ok_or_else(|| {
        anyhow!(
            "cable '{}' between '{}' and '{}' is not part of the circuit script",
            cut.cable,
            cut.from_bus,
            cut.to_bus
        )
    })?;
    info!(
        line = line.name.as_str(),
        distance = cut.distance,
        "removed line to make the network radial"
    );
    Ok(Some(AppliedCut { cut, line }))
}
