use crate::graph::ImpedanceGraph;
use anyhow::{anyhow, Result};
use petgraph::algo::connected_components;
use petgraph::visit::EdgeRef;
use std::collections::{HashSet, VecDeque};

/// Summary statistics produced by `graph stats` (degree, components, loops).
#[derive(Debug)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub connected_components: usize,
    pub min_degree: usize,
    pub avg_degree: f64,
    pub max_degree: usize,
    pub density: f64,
    /// Number of independent loops, `E - V + C`; zero for a radial network.
    pub cyclomatic_number: usize,
}

/// Island summary used in `graph islands`.
#[derive(Debug)]
pub struct IslandSummary {
    pub island_id: usize,
    pub node_count: usize,
}

/// Bus to island assignment for `--emit` output.
#[derive(Debug)]
pub struct NodeAssignment {
    pub node_index: usize,
    pub label: String,
    pub island_id: usize,
}

/// Aggregated island analysis result.
#[derive(Debug)]
pub struct IslandAnalysis {
    pub islands: Vec<IslandSummary>,
    pub assignments: Vec<NodeAssignment>,
}

/// Calculates degree distribution, density, component count and loop count.
pub fn graph_stats(network: &ImpedanceGraph) -> Result<GraphStats> {
    let graph = network.graph();
    let node_count = graph.node_count();
    let edge_count = graph.edge_count();
    let mut degrees = Vec::with_capacity(node_count);
    for node in graph.node_indices() {
        degrees.push(graph.neighbors(node).count());
    }
    let min_degree = *degrees.iter().min().unwrap_or(&0);
    let max_degree = *degrees.iter().max().unwrap_or(&0);
    let avg_degree = if node_count == 0 {
        0.0
    } else {
        degrees.iter().copied().sum::<usize>() as f64 / node_count as f64
    };
    let density = if node_count < 2 {
        0.0
    } else {
        2.0 * edge_count as f64 / (node_count as f64 * (node_count as f64 - 1.0))
    };
    let connected_components = connected_components(graph);
    let cyclomatic_number = (edge_count + connected_components).saturating_sub(node_count);
    Ok(GraphStats {
        node_count,
        edge_count,
        connected_components,
        min_degree,
        avg_degree,
        max_degree,
        density,
        cyclomatic_number,
    })
}

/// True when the graph contains no loop, i.e. every component is a tree.
pub fn is_radial(network: &ImpedanceGraph) -> bool {
    let graph = network.graph();
    graph.edge_count() + connected_components(graph) == graph.node_count()
}

/// Labels connected components (breadth-first search) for CLI reporting.
pub fn find_islands(network: &ImpedanceGraph) -> Result<IslandAnalysis> {
    let graph = network.graph();
    let mut visited = HashSet::new();
    let mut islands = Vec::new();
    let mut assignments = Vec::new();
    let mut island_id = 0;
    for start in graph.node_indices() {
        if visited.contains(&start) {
            continue;
        }
        let mut queue = VecDeque::new();
        queue.push_back(start);
        let mut members = Vec::new();
        while let Some(node) = queue.pop_front() {
            if !visited.insert(node) {
                continue;
            }
            members.push(node);
            for neighbor in graph.neighbors(node) {
                if !visited.contains(&neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        if members.is_empty() {
            continue;
        }
        islands.push(IslandSummary {
            island_id,
            node_count: members.len(),
        });
        for node in members {
            assignments.push(NodeAssignment {
                node_index: node.index(),
                label: graph[node].clone(),
                island_id,
            });
        }
        island_id += 1;
    }
    assignments.sort_by_key(|assignment| assignment.node_index);
    Ok(IslandAnalysis {
        islands,
        assignments,
    })
}

/// Export the topology to a DOT string (Graphviz) for external visualisation.
pub fn export_graph(network: &ImpedanceGraph, format: &str) -> Result<String> {
    match format.to_ascii_lowercase().as_str() {
        "graphviz" | "dot" => Ok(render_dot(network)),
        other => Err(anyhow!("unsupported graph export format '{other}'")),
    }
}

fn render_dot(network: &ImpedanceGraph) -> String {
    let graph = network.graph();
    let mut buffer = String::new();
    buffer.push_str("graph lvgrid_network {\n");
    for node in graph.node_indices() {
        let label = sanitize_label(&graph[node]);
        buffer.push_str(&format!("  n{} [label=\"{}\"];\n", node.index(), label));
    }
    for edge in graph.edge_references() {
        let source = edge.source().index();
        let target = edge.target().index();
        let cable = sanitize_label(&edge.weight().cable);
        let weight = edge.weight().weight;
        buffer.push_str(&format!(
            "  n{source} -- n{target} [label=\"{cable} ({weight:.4})\"];\n"
        ));
    }
    buffer.push('}');
    buffer
}

fn sanitize_label(label: &str) -> String {
    label.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CableRecord;

    fn ring() -> ImpedanceGraph {
        ImpedanceGraph::from_cables(&[
            CableRecord::new("ab", "a", "b", 1.0, 0.0, 1.0),
            CableRecord::new("bc", "b", "c", 1.0, 0.0, 1.0),
            CableRecord::new("ca", "c", "a", 1.0, 0.0, 1.0),
            CableRecord::new("xy", "x", "y", 1.0, 0.0, 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn stats_count_loops_and_components() {
        let stats = graph_stats(&ring()).unwrap();
        assert_eq!(stats.node_count, 5);
        assert_eq!(stats.edge_count, 4);
        assert_eq!(stats.connected_components, 2);
        assert_eq!(stats.cyclomatic_number, 1);
        assert_eq!(stats.min_degree, 1);
        assert_eq!(stats.max_degree, 2);
    }

    #[test]
    fn stats_on_empty_graph() {
        let stats = graph_stats(&ImpedanceGraph::new()).unwrap();
        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.cyclomatic_number, 0);
        assert_eq!(stats.density, 0.0);
    }

    #[test]
    fn radial_check() {
        let mut graph = ring();
        assert!(!is_radial(&graph));
        graph.remove_edge_between("a", "c");
        assert!(is_radial(&graph));
        assert!(is_radial(&ImpedanceGraph::new()));
    }

    #[test]
    fn islands_are_labelled() {
        let analysis = find_islands(&ring()).unwrap();
        assert_eq!(analysis.islands.len(), 2);
        assert_eq!(analysis.islands[0].node_count, 3);
        assert_eq!(analysis.assignments[3].label, "x");
        assert_eq!(analysis.assignments[3].island_id, 1);
    }

    #[test]
    fn dot_export() {
        let dot = export_graph(&ring(), "dot").unwrap();
        assert!(dot.starts_with("graph lvgrid_network {"));
        assert!(dot.contains("[label=\"a\"]"));
        assert!(dot.contains("ab (1.0000)"));
        assert!(export_graph(&ring(), "svg").is_err());
    }
}
