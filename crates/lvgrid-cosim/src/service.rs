//! The `load_flow_current_step` calculation.
//!
//! Initialisation renders the circuit once (with the radial cut applied).
//! Every step then recompiles that circuit, writes the per-phase demand of
//! each e-connection into the engine's loads, solves, and publishes bus
//! voltages, line currents and transformer loading together with their
//! limits.

use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use lvgrid_core::{Kilovars, Kilowatts};
use lvgrid_io::topology::ensure_valid;
use lvgrid_io::{radialize, AppliedCut, CircuitScript, Topology};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ServiceConfig;
use crate::session::{round2, PowerFlowSession};
use crate::sink::{DataPoint, TimeSeriesSink};

pub const CALCULATION_NAME: &str = "load_flow_current_step";
pub const CONNECTION_TYPE: &str = "EConnection";
pub const ACTIVE_POWER_INPUT: &str = "aggregated_active_power";
pub const REACTIVE_POWER_INPUT: &str = "aggregated_reactive_power";

/// Federate inputs of one step, keyed `<type>/<input>/<connection id>`.
/// Values are per phase, in W (active) and var (reactive).
pub type StepInputs = HashMap<String, Vec<f64>>;

/// Key under which the framework delivers `input` for `connection_id`.
pub fn input_key(input: &str, connection_id: &str) -> String {
    format!("{CONNECTION_TYPE}/{input}/{connection_id}")
}

#[derive(Debug, Error, PartialEq)]
pub enum StepError {
    #[error("missing input '{key}'")]
    MissingInput { key: String },
    #[error(
        "connection '{connection}' has {active} active but {reactive} reactive phase values"
    )]
    PhaseMismatch {
        connection: String,
        active: usize,
        reactive: usize,
    },
    #[error("circuit has {available} loads; connection '{connection}' needs more")]
    LoadsExhausted {
        connection: String,
        available: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDescriptor {
    pub esdl_type: String,
    pub input_name: String,
    pub unit: String,
    /// Per-phase vector rather than a scalar.
    pub vector: bool,
}

/// How the calculation is registered with the co-simulation framework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationDescriptor {
    pub name: String,
    pub period_seconds: u64,
    pub offset_seconds: u64,
    pub terminate_on_error: bool,
    pub inputs: Vec<InputDescriptor>,
}

impl CalculationDescriptor {
    pub fn load_flow(period_seconds: u64) -> Self {
        let input = |name: &str| InputDescriptor {
            esdl_type: CONNECTION_TYPE.to_string(),
            input_name: name.to_string(),
            unit: "W".to_string(),
            vector: true,
        };
        Self {
            name: CALCULATION_NAME.to_string(),
            period_seconds,
            offset_seconds: 0,
            terminate_on_error: true,
            inputs: vec![input(ACTIVE_POWER_INPUT), input(REACTIVE_POWER_INPUT)],
        }
    }
}

/// Summary of one calculation step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub time: DateTime<Utc>,
    pub active_power: Kilowatts,
    pub reactive_power: Kilovars,
    pub loads_assigned: usize,
    pub points_published: usize,
}

#[derive(Debug, Clone)]
pub struct LoadFlowService {
    config: ServiceConfig,
    script: CircuitScript,
    connections: Vec<String>,
    cut: Option<AppliedCut>,
    descriptor: CalculationDescriptor,
}

impl LoadFlowService {
    /// Validate the topology, render its circuit and apply the radial cut.
    pub fn initialize(config: ServiceConfig, topology: &Topology) -> Result<Self> {
        ensure_valid(topology, &config.lv_cable_marker)?;
        let mut script = CircuitScript::from_topology(topology, &config.script_options());

        let cut = if config.radial_reduction {
            let source = config
                .source_bus
                .clone()
                .or_else(|| topology.source_bus())
                .ok_or_else(|| {
                    anyhow!(
                        "topology '{}' has no import and no source_bus is configured",
                        topology.name
                    )
                })?;
            radialize(topology, &mut script, &source, &config.lv_cable_marker)
                .with_context(|| format!("radial reduction from source bus '{source}'"))?
        } else {
            None
        };

        let connections = topology.connection_ids();
        let descriptor = CalculationDescriptor::load_flow(config.period_seconds);
        info!(
            network = topology.network_name().as_str(),
            connections = connections.len(),
            loads = script.load_count(),
            cut = cut.as_ref().map(|c| c.line.name.as_str()),
            "load-flow service initialised"
        );
        Ok(Self {
            config,
            script,
            connections,
            cut,
            descriptor,
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn script(&self) -> &CircuitScript {
        &self.script
    }

    /// E-connection identifiers, in the order their phases map onto loads.
    pub fn connections(&self) -> &[String] {
        &self.connections
    }

    pub fn cut(&self) -> Option<&AppliedCut> {
        self.cut.as_ref()
    }

    pub fn descriptor(&self) -> &CalculationDescriptor {
        &self.descriptor
    }

    /// Run one load-flow step and publish its results to `sink`.
    pub fn step<S, K>(
        &self,
        session: &mut S,
        inputs: &StepInputs,
        time: DateTime<Utc>,
        esdl_id: &str,
        sink: &mut K,
    ) -> Result<StepReport>
    where
        S: PowerFlowSession + ?Sized,
        K: TimeSeriesSink + ?Sized,
    {
        session.compile(&self.script)?;

        let available = session.load_count();
        let mut next_load = 0;
        let mut active_total = Kilowatts(0.0);
        let mut reactive_total = Kilovars(0.0);
        for connection in &self.connections {
            let active = phase_values(inputs, ACTIVE_POWER_INPUT, connection)?;
            let reactive = phase_values(inputs, REACTIVE_POWER_INPUT, connection)?;
            if active.len() != reactive.len() {
                return Err(StepError::PhaseMismatch {
                    connection: connection.clone(),
                    active: active.len(),
                    reactive: reactive.len(),
                }
                .into());
            }
            for (&p, &q) in active.iter().zip(reactive) {
                if next_load >= available {
                    return Err(StepError::LoadsExhausted {
                        connection: connection.clone(),
                        available,
                    }
                    .into());
                }
                let kw = Kilowatts::from_watts(p);
                let kvar = Kilovars::from_vars(q);
                session.set_load(next_load, kw, kvar)?;
                active_total = active_total + kw;
                reactive_total = reactive_total + kvar;
                next_load += 1;
            }
            debug!(connection = connection.as_str(), phases = active.len(), "assigned demand");
        }

        session.solve()?;
        let results = session.results()?;

        let mut publisher = Publisher {
            sink,
            esdl_id,
            time,
            published: 0,
        };
        for voltage in &results.node_voltages {
            publisher.publish(&voltage.node, round2(voltage.magnitude))?;
        }
        for line in &results.lines {
            publisher.publish(&line.name, line.total_current())?;
            publisher.publish(&format!("{}_limit", line.name), line.normal_amps.value())?;
        }
        for transformer in &results.transformers {
            publisher.publish(&transformer.name, transformer.loading())?;
            publisher.publish(
                &format!("{}_limit", transformer.name),
                transformer.rated_kva.value(),
            )?;
        }

        let report = StepReport {
            time,
            active_power: active_total,
            reactive_power: reactive_total,
            loads_assigned: next_load,
            points_published: publisher.published,
        };
        info!(
            %time,
            active_kw = report.active_power.value(),
            reactive_kvar = report.reactive_power.value(),
            points = report.points_published,
            "load-flow step finished"
        );
        Ok(report)
    }
}

fn phase_values<'a>(inputs: &'a StepInputs, input: &str, connection: &str) -> Result<&'a [f64]> {
    let key = input_key(input, connection);
    match inputs.get(&key) {
        Some(values) => Ok(values),
        None => Err(StepError::MissingInput { key }.into()),
    }
}

struct Publisher<'a, K: ?Sized> {
    sink: &'a mut K,
    esdl_id: &'a str,
    time: DateTime<Utc>,
    published: usize,
}

impl<K: TimeSeriesSink + ?Sized> Publisher<'_, K> {
    fn publish(&mut self, output_name: &str, value: f64) -> Result<()> {
        self.sink.record(DataPoint {
            esdl_id: self.esdl_id.to_string(),
            output_name: output_name.to_string(),
            time: self.time,
            value,
        })?;
        self.published += 1;
        Ok(())
    }
}
