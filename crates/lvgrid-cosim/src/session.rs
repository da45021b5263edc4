//! Boundary to the external power-flow engine.
//!
//! The engine is driven through an explicitly owned session object: the
//! service compiles a circuit script into it, writes load set-points and
//! solves. Nothing here assumes a particular engine.

use anyhow::Result;
use lvgrid_core::{Amperes, Kilovars, KilovoltAmperes, Kilowatts};
use lvgrid_io::CircuitScript;
use serde::{Deserialize, Serialize};

/// An owned handle on a power-flow engine instance.
pub trait PowerFlowSession {
    /// Replace the engine state with the given circuit.
    fn compile(&mut self, script: &CircuitScript) -> Result<()>;

    /// Number of loads in the compiled circuit, in engine order.
    fn load_count(&self) -> usize;

    /// Set the demand of the load at `index` (engine order).
    fn set_load(&mut self, index: usize, active: Kilowatts, reactive: Kilovars) -> Result<()>;

    fn solve(&mut self) -> Result<()>;

    /// Results of the last successful solve.
    fn results(&self) -> Result<SolveResults>;
}

/// Voltage magnitude at one node (bus and phase), in volts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeVoltage {
    pub node: String,
    pub magnitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineResult {
    pub name: String,
    /// Current magnitude per conductor at the sending end.
    pub phase_currents_a: Vec<f64>,
    pub normal_amps: Amperes,
}

impl LineResult {
    /// Sum of the three phase current magnitudes, each rounded to 0.01 A.
    /// The neutral conductor is not counted.
    pub fn total_current(&self) -> f64 {
        self.phase_currents_a.iter().take(3).map(|&i| round2(i)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerResult {
    pub name: String,
    /// Total power flowing through the primary winding.
    pub total_power: (Kilowatts, Kilovars),
    pub rated_kva: KilovoltAmperes,
}

impl TransformerResult {
    /// Apparent power rounded to 0.01 kVA.
    pub fn loading(&self) -> f64 {
        let (p, q) = self.total_power;
        round2(p.apparent_power(q).value())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolveResults {
    pub node_voltages: Vec<NodeVoltage>,
    pub lines: Vec<LineResult>,
    pub transformers: Vec<TransformerResult>,
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding() {
        assert_eq!(round2(230.456), 230.46);
        assert_eq!(round2(-1.234), -1.23);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn line_total_ignores_neutral() {
        let line = LineResult {
            name: "cable1".into(),
            phase_currents_a: vec![10.004, 20.006, 30.0, 99.0],
            normal_amps: Amperes(400.0),
        };
        assert!((line.total_current() - 60.01).abs() < 1e-9);
    }

    #[test]
    fn line_with_fewer_conductors() {
        let line = LineResult {
            name: "stub".into(),
            phase_currents_a: vec![1.5],
            normal_amps: Amperes(100.0),
        };
        assert_eq!(line.total_current(), 1.5);
    }

    #[test]
    fn transformer_loading_is_apparent_power() {
        let trafo = TransformerResult {
            name: "trafo1".into(),
            total_power: (Kilowatts(30.0), Kilovars(-40.0)),
            rated_kva: KilovoltAmperes(400.0),
        };
        assert_eq!(trafo.loading(), 50.0);
    }
}
