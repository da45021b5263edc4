//! Error type for the graph layer
//!
//! [`GridError`] is what the cable graph and the radial reduction report.
//! Domain-specific errors (for example the radial reduction errors in
//! `lvgrid-algo`) convert into it so callers can use `?` uniformly.
//!
//! # Example
//!
//! ```
//! use lvgrid_core::{CableRecord, GridError, GridResult, ImpedanceGraph};
//!
//! fn build(cables: &[CableRecord]) -> GridResult<usize> {
//!     let graph = ImpedanceGraph::from_cables(cables)?;
//!     Ok(graph.edge_count())
//! }
//!
//! let bad = CableRecord::new("cable1", "joint1", "joint2", f64::NAN, 0.08, 0.35);
//! assert!(matches!(build(&[bad]), Err(GridError::Validation(_))));
//! ```

use thiserror::Error;

/// Unified error type for lvgrid graph operations.
#[derive(Error, Debug)]
pub enum GridError {
    /// Data validation errors (negative impedance, NaN length, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors, e.g. a source bus that is not part of the network
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results using GridError.
pub type GridResult<T> = Result<T, GridError>;
