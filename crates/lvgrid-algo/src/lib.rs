//! # lvgrid-algo: Network Reduction Algorithms
//!
//! Graph algorithms operating on [`lvgrid_core::ImpedanceGraph`].
//!
//! - [`graph::radial`] - choose the cable whose removal turns a meshed
//!   medium-voltage feeder into a radial one

pub mod graph;

pub use graph::radial::{select_cut, shortest_distances, DistanceMap, RadialCut, ReductionError};
