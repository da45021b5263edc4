//! # lvgrid-cosim: Load-Flow Calculation Service
//!
//! The calculation a co-simulation federate runs every period: inject the
//! aggregated per-phase demand of every e-connection into a power-flow
//! engine, solve, and publish network state to a time-series sink.
//!
//! The engine and the sink are traits ([`PowerFlowSession`],
//! [`TimeSeriesSink`]); the federate wiring that drives
//! [`LoadFlowService::step`] lives outside this crate.
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use lvgrid_cosim::{InMemorySink, LoadFlowService, PowerFlowSession, ServiceConfig, StepInputs};
//! use lvgrid_io::load_topology;
//!
//! fn run(session: &mut dyn PowerFlowSession, inputs: &StepInputs) -> anyhow::Result<()> {
//!     let topology = load_topology("mv-energy-system.json")?;
//!     let service = LoadFlowService::initialize(ServiceConfig::default(), &topology)?;
//!     let mut sink = InMemorySink::new();
//!     let report = service.step(session, inputs, Utc::now(), "network-1", &mut sink)?;
//!     println!("{} points published", report.points_published);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod service;
pub mod session;
pub mod sink;

pub use config::ServiceConfig;
pub use service::{
    input_key, CalculationDescriptor, InputDescriptor, LoadFlowService, StepError, StepInputs,
    StepReport,
};
pub use session::{LineResult, NodeVoltage, PowerFlowSession, SolveResults, TransformerResult};
pub use sink::{DataPoint, InMemorySink, TimeSeriesSink};
