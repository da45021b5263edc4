//! Radial reduction of a meshed medium-voltage network.
//!
//! The cut is placed at the electrical fringe of the feeder:
//!
//! 1. **Distances**: single-source Dijkstra over the impedance weights,
//!    starting at the source bus. Unreachable buses get no entry.
//! 2. **Farthest bus**: the bus with the largest distance. Ties go to the
//!    bus that was inserted into the graph first.
//! 3. **Edge**: among the cables incident to the farthest bus, the one whose
//!    other end is itself farthest from the source (the cable pointing away
//!    from the source rather than back towards it). Ties again go to the
//!    earliest inserted neighbour.
//!
//! The selection is pure; removing the cable from the circuit description is
//! left to the caller.

use std::collections::HashMap;

use lvgrid_core::{GridError, ImpedanceGraph, NodeIndex};
use petgraph::algo::dijkstra;
use petgraph::visit::EdgeRef;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised by the radial reduction.
#[derive(Debug, Error, PartialEq)]
pub enum ReductionError {
    /// The source bus is not part of a non-empty graph. The topology
    /// description is inconsistent; retrying with the same input fails again.
    #[error("source bus '{bus}' is not part of the cable graph ({node_count} buses)")]
    SourceNotFound { bus: String, node_count: usize },
}

impl From<ReductionError> for GridError {
    fn from(err: ReductionError) -> Self {
        GridError::Config(err.to_string())
    }
}

/// Shortest cumulative impedance from the source to every reachable bus.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DistanceMap {
    /// Reachable buses in graph insertion order.
    entries: Vec<(String, f64)>,
    #[serde(skip)]
    lookup: HashMap<String, usize>,
}

impl DistanceMap {
    fn from_dijkstra(graph: &ImpedanceGraph, distances: &HashMap<NodeIndex, f64>) -> Self {
        let mut map = DistanceMap::default();
        for node in graph.graph().node_indices() {
            if let Some(distance) = distances.get(&node) {
                let bus = graph.label(node).to_string();
                map.lookup.insert(bus.clone(), map.entries.len());
                map.entries.push((bus, *distance));
            }
        }
        map
    }

    pub fn get(&self, bus: &str) -> Option<f64> {
        self.lookup.get(bus).map(|&pos| self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(bus, d)| (bus.as_str(), *d))
    }
}

/// The cable selected for removal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadialCut {
    /// Bus farthest from the source.
    pub from_bus: String,
    /// Neighbour of `from_bus` on the selected cable.
    pub to_bus: String,
    /// Name of the cable that produced the edge.
    pub cable: String,
    /// Impedance distance of `from_bus` from the source.
    pub distance: f64,
}

impl RadialCut {
    /// Endpoints as an ordered pair.
    pub fn endpoints(&self) -> (&str, &str) {
        (&self.from_bus, &self.to_bus)
    }
}

fn source_index(graph: &ImpedanceGraph, source: &str) -> Result<NodeIndex, ReductionError> {
    graph
        .node_index(source)
        .ok_or_else(|| ReductionError::SourceNotFound {
            bus: source.to_string(),
            node_count: graph.node_count(),
        })
}

fn dijkstra_from(graph: &ImpedanceGraph, source: NodeIndex) -> HashMap<NodeIndex, f64> {
    dijkstra(graph.graph(), source, None, |edge| edge.weight().weight)
}

/// Distance map from `source`. An empty graph yields an empty map.
pub fn shortest_distances(
    graph: &ImpedanceGraph,
    source: &str,
) -> Result<DistanceMap, ReductionError> {
    if graph.is_empty() {
        return Ok(DistanceMap::default());
    }
    let source = source_index(graph, source)?;
    Ok(DistanceMap::from_dijkstra(
        graph,
        &dijkstra_from(graph, source),
    ))
}

/// Pick the cable to remove so the meshed graph becomes radial.
///
/// Returns `Ok(None)` for an empty graph, and also when the farthest bus has
/// no incident cable to another bus (the source is isolated). Self-loops are
/// never selected.
pub fn select_cut(
    graph: &ImpedanceGraph,
    source: &str,
) -> Result<Option<RadialCut>, ReductionError> {
    if graph.is_empty() {
        debug!("cable graph is empty; no radial cut required");
        return Ok(None);
    }
    let source_idx = source_index(graph, source)?;
    let distances = dijkstra_from(graph, source_idx);
    let g = graph.graph();

    // node_indices() runs in insertion order, so strict `>` keeps the first.
    let mut farthest: Option<(NodeIndex, f64)> = None;
    for node in g.node_indices() {
        if let Some(&distance) = distances.get(&node) {
            if farthest.map_or(true, |(_, best)| distance > best) {
                farthest = Some((node, distance));
            }
        }
    }
    let Some((far, far_distance)) = farthest else {
        return Ok(None);
    };
    debug!(
        source,
        reachable = distances.len(),
        farthest = g[far].as_str(),
        distance = far_distance,
        "computed impedance distances"
    );

    let mut chosen: Option<(NodeIndex, f64, &str)> = None;
    for edge in g.edges(far) {
        let other = if edge.source() == far {
            edge.target()
        } else {
            edge.source()
        };
        // a self-loop on the farthest bus is not a neighbour
        if other == far {
            continue;
        }
        let Some(&distance) = distances.get(&other) else {
            continue;
        };
        let better = match chosen {
            None => true,
            Some((best_node, best_distance, _)) => {
                distance > best_distance
                    || (distance == best_distance && other.index() < best_node.index())
            }
        };
        if better {
            chosen = Some((other, distance, edge.weight().cable.as_str()));
        }
    }

    let Some((neighbor, _, cable)) = chosen else {
        return Ok(None);
    };
    let cut = RadialCut {
        from_bus: g[far].clone(),
        to_bus: g[neighbor].clone(),
        cable: cable.to_string(),
        distance: far_distance,
    };
    info!(
        cable = cut.cable.as_str(),
        from = cut.from_bus.as_str(),
        to = cut.to_bus.as_str(),
        "selected cable for radial reduction"
    );
    Ok(Some(cut))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lvgrid_core::{is_radial, CableRecord};

    fn unit(name: &str, a: &str, b: &str, weight: f64) -> CableRecord {
        CableRecord::new(name, a, b, weight, 0.0, 1.0)
    }

    /// A-B, B-C, B-D, C-D with unit weights.
    fn diamond() -> ImpedanceGraph {
        ImpedanceGraph::from_cables(&[
            unit("ab", "A", "B", 1.0),
            unit("bc", "B", "C", 1.0),
            unit("bd", "B", "D", 1.0),
            unit("cd", "C", "D", 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn distances_from_source() {
        let distances = shortest_distances(&diamond(), "A").unwrap();
        assert_eq!(distances.len(), 4);
        assert_eq!(distances.get("A"), Some(0.0));
        assert_eq!(distances.get("B"), Some(1.0));
        assert_eq!(distances.get("C"), Some(2.0));
        assert_eq!(distances.get("D"), Some(2.0));
        let order: Vec<_> = distances.iter().map(|(bus, _)| bus).collect();
        assert_eq!(order, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn unreachable_buses_are_absent() {
        let graph = ImpedanceGraph::from_cables(&[
            unit("ab", "A", "B", 1.0),
            unit("xy", "X", "Y", 1.0),
        ])
        .unwrap();
        let distances = shortest_distances(&graph, "A").unwrap();
        assert_eq!(distances.len(), 2);
        assert_eq!(distances.get("X"), None);
    }

    #[test]
    fn diamond_cuts_cable_pointing_away_from_source() {
        let cut = select_cut(&diamond(), "A").unwrap().unwrap();
        // C and D tie at distance 2; C was inserted first.
        assert_eq!(cut.endpoints(), ("C", "D"));
        assert_eq!(cut.cable, "cd");
        assert_eq!(cut.distance, 2.0);
    }

    #[test]
    fn single_cable_is_selected_trivially() {
        let graph = ImpedanceGraph::from_cables(&[unit("ab", "A", "B", 5.0)]).unwrap();
        let cut = select_cut(&graph, "A").unwrap().unwrap();
        assert_eq!(cut.endpoints(), ("B", "A"));
        assert_eq!(cut.distance, 5.0);
    }

    #[test]
    fn empty_graph_is_a_no_op() {
        let graph = ImpedanceGraph::from_cables(&[]).unwrap();
        assert_eq!(select_cut(&graph, "anything").unwrap(), None);
        assert!(shortest_distances(&graph, "anything").unwrap().is_empty());
    }

    #[test]
    fn missing_source_is_a_configuration_error() {
        let err = select_cut(&diamond(), "Z").unwrap_err();
        assert_eq!(
            err,
            ReductionError::SourceNotFound {
                bus: "Z".into(),
                node_count: 4
            }
        );
        let grid_err: GridError = err.into();
        assert!(matches!(grid_err, GridError::Config(_)));
    }

    #[test]
    fn selection_is_idempotent() {
        let graph = diamond();
        let first = select_cut(&graph, "A").unwrap();
        let second = select_cut(&graph, "A").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn selected_edge_exists_and_ring_becomes_radial() {
        // Ring fed at s: s-a-b-c-s. b is farthest; a and c tie as neighbours.
        let mut graph = ImpedanceGraph::from_cables(&[
            unit("sa", "s", "a", 1.0),
            unit("ab", "a", "b", 1.0),
            unit("bc", "b", "c", 3.0),
            unit("cs", "c", "s", 1.0),
        ])
        .unwrap();
        let cut = select_cut(&graph, "s").unwrap().unwrap();
        assert!(graph.edge_between(&cut.from_bus, &cut.to_bus).is_some());
        assert_eq!(cut.endpoints(), ("b", "a"));
        assert_eq!(cut.cable, "ab");

        let reachable_before = shortest_distances(&graph, "s").unwrap().len();
        graph.remove_edge_between(&cut.from_bus, &cut.to_bus);
        assert!(is_radial(&graph));
        assert_eq!(
            shortest_distances(&graph, "s").unwrap().len(),
            reachable_before
        );
    }

    #[test]
    fn impedance_weights_drive_the_farthest_bus() {
        // Same topology as the diamond, but D sits electrically further away.
        let graph = ImpedanceGraph::from_cables(&[
            CableRecord::new("ab", "A", "B", 0.3, 0.4, 1.0),
            CableRecord::new("bc", "B", "C", 0.3, 0.4, 1.0),
            CableRecord::new("bd", "B", "D", 0.3, 0.4, 3.0),
            CableRecord::new("cd", "C", "D", 0.3, 0.4, 4.0),
        ])
        .unwrap();
        let cut = select_cut(&graph, "A").unwrap().unwrap();
        // distances: A 0, B 0.5, C 1.0, D 2.0 -> D farthest, C beats B
        assert_eq!(cut.endpoints(), ("D", "C"));
        assert!((cut.distance - 2.0).abs() < 1e-12);
    }

    #[test]
    fn self_loop_on_the_farthest_bus_is_skipped() {
        let graph = ImpedanceGraph::from_cables(&[
            unit("sa", "s", "a", 1.0),
            unit("ab", "a", "b", 1.0),
            unit("bs", "b", "s", 3.0),
            unit("loop", "b", "b", 1.0),
        ])
        .unwrap();
        let cut = select_cut(&graph, "s").unwrap().unwrap();
        assert_eq!(cut.endpoints(), ("b", "a"));
        assert_eq!(cut.cable, "ab");
        assert!((cut.distance - 2.0).abs() < 1e-12);
    }

    #[test]
    fn cut_serializes() {
        let cut = select_cut(&diamond(), "A").unwrap().unwrap();
        let json = serde_json::to_value(&cut).unwrap();
        assert_eq!(json["cable"], "cd");
        assert_eq!(json["from_bus"], "C");
    }
}
