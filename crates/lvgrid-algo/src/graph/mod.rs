//! Graph algorithms for distribution network analysis.
//!
//! The downstream power-flow model assumes a radial feeder. The
//! [`radial`] module picks the cable to open when the cable description
//! contains a loop:
//!
//! ```ignore
//! use lvgrid_algo::graph::radial::select_cut;
//!
//! let graph = ImpedanceGraph::from_cables(&cables)?;
//! if let Some(cut) = select_cut(&graph, "joint1")? {
//!     println!("open {} between {} and {}", cut.cable, cut.from_bus, cut.to_bus);
//! }
//! ```

pub mod radial;
