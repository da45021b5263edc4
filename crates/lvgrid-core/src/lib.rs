//! # lvgrid-core: Distribution Network Graph Core
//!
//! Shared data structures for the low-voltage grid co-simulation service.
//!
//! ## Design Philosophy
//!
//! The power-flow engine itself is external. What this crate models is the
//! part of the network that needs decisions on our side: the
//! **medium-voltage cable graph** where
//! - **Nodes** are buses/joints, identified by name
//! - **Edges** are cables weighted by `|r1 + jx1| * length`
//!
//! The graph is rebuilt from the topology description on every
//! initialisation and is used to pick the cable that makes a meshed feeder
//! radial (see `lvgrid-algo`).
//!
//! ## Quick Start
//!
//! ```rust
//! use lvgrid_core::{CableRecord, ImpedanceGraph};
//!
//! let cables = vec![
//!     CableRecord::new("cable1", "joint1", "joint2", 0.206, 0.08, 0.35),
//!     CableRecord::new("cable2", "joint2", "joint3", 0.206, 0.08, 0.20),
//! ];
//! let graph = ImpedanceGraph::from_cables(&cables).unwrap();
//! assert_eq!(graph.node_count(), 3);
//! assert_eq!(graph.edge_count(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`graph`] - [`CableRecord`] and [`ImpedanceGraph`]
//! - [`graph_utils`] - Topological analysis (stats, islands, radiality, DOT export)
//! - [`diagnostics`] - Issues collected while reading a topology
//! - [`units`] - Unit newtypes for cable and load quantities
//! - [`error`] - [`GridError`] / [`GridResult`]

pub mod diagnostics;
pub mod error;
pub mod graph;
pub mod graph_utils;
pub mod units;

pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity, TopologyStats};
pub use error::{GridError, GridResult};
pub use graph::{CableEdge, CableRecord, ImpedanceGraph};
pub use graph_utils::*;
pub use petgraph::graph::NodeIndex;
pub use units::{
    Amperes, Kilometers, Kilovars, KilovoltAmperes, Kilovolts, Kilowatts, Meters, OhmsPerKm,
};
