//! Impedance-weighted connectivity graph of the medium-voltage cables.
//!
//! Buses are nodes, cables are undirected edges weighted with the magnitude
//! of their series impedance over the full cable length. The graph is built
//! once per initialisation from an ordered cable sequence and handed to the
//! radial reduction in `lvgrid-algo`.

use std::collections::HashMap;

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};

/// A cable between two buses with per-length impedance data.
///
/// `resistance_per_length` and `reactance_per_length` must be expressed per
/// the same unit `length` is given in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableRecord {
    pub name: String,
    pub from_bus: String,
    pub to_bus: String,
    pub resistance_per_length: f64,
    pub reactance_per_length: f64,
    pub length: f64,
}

impl CableRecord {
    pub fn new(
        name: impl Into<String>,
        from_bus: impl Into<String>,
        to_bus: impl Into<String>,
        resistance_per_length: f64,
        reactance_per_length: f64,
        length: f64,
    ) -> Self {
        Self {
            name: name.into(),
            from_bus: from_bus.into(),
            to_bus: to_bus.into(),
            resistance_per_length,
            reactance_per_length,
            length,
        }
    }

    /// `sqrt(r1² + x1²) * length`
    #[inline]
    pub fn impedance_weight(&self) -> f64 {
        self.resistance_per_length.hypot(self.reactance_per_length) * self.length
    }

    fn validate(&self) -> GridResult<()> {
        let fields = [
            ("resistance", self.resistance_per_length),
            ("reactance", self.reactance_per_length),
            ("length", self.length),
        ];
        for (label, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(GridError::Validation(format!(
                    "cable '{}' has invalid {label} {value}; expected a finite value >= 0",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

/// Edge payload: the impedance weight and the cable that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CableEdge {
    pub cable: String,
    pub weight: f64,
}

/// Undirected graph of buses connected by cables.
///
/// Node indices follow first-appearance order of the bus identifiers in the
/// cable sequence. A second cable between the same pair of buses replaces
/// the first one (no parallel edges).
#[derive(Debug, Clone, Default)]
pub struct ImpedanceGraph {
    graph: UnGraph<String, CableEdge>,
    index: HashMap<String, NodeIndex>,
}

impl ImpedanceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from an ordered cable sequence.
    ///
    /// An empty sequence yields an empty graph.
    pub fn from_cables(cables: &[CableRecord]) -> GridResult<Self> {
        let mut graph = Self::new();
        for cable in cables {
            graph.add_cable(cable)?;
        }
        Ok(graph)
    }

    /// Insert (or overwrite) the edge for a single cable.
    pub fn add_cable(&mut self, cable: &CableRecord) -> GridResult<EdgeIndex> {
        cable.validate()?;
        let a = self.ensure_node(&cable.from_bus);
        let b = self.ensure_node(&cable.to_bus);
        let edge = CableEdge {
            cable: cable.name.clone(),
            weight: cable.impedance_weight(),
        };
        Ok(self.graph.update_edge(a, b, edge))
    }

    fn ensure_node(&mut self, bus: &str) -> NodeIndex {
        if let Some(idx) = self.index.get(bus) {
            return *idx;
        }
        let idx = self.graph.add_node(bus.to_string());
        self.index.insert(bus.to_string(), idx);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn node_index(&self, bus: &str) -> Option<NodeIndex> {
        self.index.get(bus).copied()
    }

    pub fn contains_bus(&self, bus: &str) -> bool {
        self.index.contains_key(bus)
    }

    /// Bus identifier stored on a node.
    pub fn label(&self, node: NodeIndex) -> &str {
        &self.graph[node]
    }

    /// Bus identifiers in insertion order.
    pub fn buses(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.node_indices().map(move |idx| self.graph[idx].as_str())
    }

    /// Edge payload between two buses, in either orientation.
    pub fn edge_between(&self, a: &str, b: &str) -> Option<&CableEdge> {
        let (a, b) = (self.node_index(a)?, self.node_index(b)?);
        let edge = self.graph.find_edge(a, b)?;
        self.graph.edge_weight(edge)
    }

    pub fn weight_between(&self, a: &str, b: &str) -> Option<f64> {
        self.edge_between(a, b).map(|edge| edge.weight)
    }

    /// Neighbours of a bus together with the connecting edge weight.
    pub fn neighbors(&self, bus: &str) -> Vec<(&str, f64)> {
        let Some(idx) = self.node_index(bus) else {
            return Vec::new();
        };
        self.graph
            .edges(idx)
            .map(|edge| {
                let other = if edge.source() == idx {
                    edge.target()
                } else {
                    edge.source()
                };
                (self.graph[other].as_str(), edge.weight().weight)
            })
            .collect()
    }

    /// Remove the edge between two buses, returning its payload.
    ///
    /// Buses stay in the graph even when they become isolated.
    pub fn remove_edge_between(&mut self, a: &str, b: &str) -> Option<CableEdge> {
        let (a, b) = (self.node_index(a)?, self.node_index(b)?);
        let edge = self.graph.find_edge(a, b)?;
        self.graph.remove_edge(edge)
    }

    /// Underlying petgraph structure for graph algorithms.
    pub fn graph(&self) -> &UnGraph<String, CableEdge> {
        &self.graph
    }
}
