//! # lvgrid-io: Topology Import & Circuit Scripts
//!
//! Reads the energy-system topology (imports, transformers, cables,
//! buildings, line codes) and turns it into the textual circuit description
//! the external power-flow engine compiles.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lvgrid_io::{dss::{CircuitScript, ScriptOptions}, reduce::radialize, topology::load_topology};
//!
//! fn main() -> anyhow::Result<()> {
//!     let topology = load_topology("mv-energy-system.json")?;
//!     let mut script = CircuitScript::from_topology(&topology, &ScriptOptions::default());
//!     let source = topology.source_bus().unwrap_or_else(|| "joint1".to_string());
//!     if let Some(applied) = radialize(&topology, &mut script, &source, "lv")? {
//!         println!("removed {}", applied.line.name);
//!     }
//!     std::fs::write("Main.dss", script.render())?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`topology`] - typed topology description, JSON/TOML loading, validation
//! - [`cables`] - medium-voltage cable filter and [`lvgrid_core::CableRecord`] adapter
//! - [`dss`] - circuit script model and rendering
//! - [`reduce`] - radial reduction applied to a circuit script

pub mod cables;
pub mod dss;
pub mod reduce;
pub mod topology;

pub use dss::{CircuitScript, LineElement, ScriptLine, ScriptOptions};
pub use reduce::{radialize, AppliedCut};
pub use topology::{load_topology, normalize_bus_name, Topology};
