//! Typed energy-system topology.
//!
//! The description lists assets by kind. Bus references may carry the
//! `Bus` suffix used by the modelling tool (`joint5Bus`); they are
//! normalised with [`normalize_bus_name`] wherever a bus identifier is
//! needed.
//!
//! Both JSON and TOML are accepted:
//!
//! ```json
//! {
//!   "name": "MV energy system",
//!   "imports": [{ "name": "grid", "voltage_kv": 10.0, "bus": "joint1Bus" }],
//!   "cables": [{ "name": "cable1", "from_bus": "joint1Bus", "to_bus": "joint2Bus",
//!                "line_code": "MV_AL_240", "length_m": 350.0 }],
//!   "line_codes": [{ "name": "MV_AL_240", "r1_ohm_per_km": 0.125, "x1_ohm_per_km": 0.08 }]
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use lvgrid_core::{Amperes, Diagnostics, Kilovolts, Meters, OhmsPerKm};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cables::is_low_voltage_cable;

/// Feed-in point of the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportAsset {
    pub name: String,
    pub voltage_kv: Kilovolts,
    pub bus: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerAsset {
    pub name: String,
    /// Transformer code defined in the external transformer code file.
    pub code: String,
    pub primary_bus: String,
    pub secondary_bus: String,
    pub voltage_primary_kv: Kilovolts,
    pub voltage_secondary_kv: Kilovolts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableAsset {
    pub name: String,
    pub from_bus: String,
    pub to_bus: String,
    pub line_code: String,
    pub length_m: Meters,
}

/// A building with an optional grid connection and demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub name: String,
    /// Identifier of the e-connection, used to look up federate inputs.
    #[serde(default)]
    pub connection_id: Option<String>,
    #[serde(default = "default_has_demand")]
    pub has_demand: bool,
}

fn default_has_demand() -> bool {
    true
}

/// Positive-sequence cable parameters per kilometre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineCode {
    pub name: String,
    pub r1_ohm_per_km: OhmsPerKm,
    pub x1_ohm_per_km: OhmsPerKm,
    #[serde(default)]
    pub c0_nf_per_km: f64,
    #[serde(default)]
    pub c1_nf_per_km: f64,
    #[serde(default)]
    pub norm_amps: Amperes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    pub name: String,
    #[serde(default)]
    pub imports: Vec<ImportAsset>,
    #[serde(default)]
    pub transformers: Vec<TransformerAsset>,
    #[serde(default)]
    pub cables: Vec<CableAsset>,
    #[serde(default)]
    pub buildings: Vec<Building>,
    #[serde(default)]
    pub line_codes: Vec<LineCode>,
}

/// Strip the modelling tool's `Bus` suffix: `joint5Bus` -> `joint5`.
pub fn normalize_bus_name(name: &str) -> &str {
    match name.find("Bus") {
        Some(pos) => &name[..pos],
        None => name,
    }
}

impl Topology {
    /// Circuit name: topology name with spaces replaced by underscores.
    pub fn network_name(&self) -> String {
        self.name.replace(' ', "_")
    }

    /// Bus fed by the first import, the default source of the radial reduction.
    pub fn source_bus(&self) -> Option<String> {
        self.imports
            .first()
            .map(|import| normalize_bus_name(&import.bus).to_string())
    }

    pub fn line_code(&self, name: &str) -> Option<&LineCode> {
        self.line_codes.iter().find(|code| code.name == name)
    }

    /// Normalised secondary buses of all transformers.
    pub fn secondary_buses(&self) -> HashSet<String> {
        self.transformers
            .iter()
            .map(|t| normalize_bus_name(&t.secondary_bus).to_string())
            .collect()
    }

    /// Connection identifiers of all buildings, in asset order.
    pub fn connection_ids(&self) -> Vec<String> {
        self.buildings
            .iter()
            .filter_map(|b| b.connection_id.clone())
            .collect()
    }

    /// Collect element counts and consistency issues.
    pub fn validate(&self, lv_marker: &str) -> Diagnostics {
        let mut diag = Diagnostics::new();
        diag.stats.imports = self.imports.len();
        diag.stats.transformers = self.transformers.len();
        diag.stats.cables = self.cables.len();
        diag.stats.medium_voltage_cables = self
            .cables
            .iter()
            .filter(|c| !is_low_voltage_cable(&c.name, lv_marker))
            .count();
        diag.stats.connections = self
            .buildings
            .iter()
            .filter(|b| b.connection_id.is_some())
            .count();

        if self.imports.is_empty() {
            diag.add_warning("topology", "no import asset; the source bus must be configured");
        }

        let mut names = HashSet::new();
        for cable in &self.cables {
            let entity = format!("Cable {}", cable.name);
            if !names.insert(cable.name.as_str()) {
                diag.add_error_with_entity("topology", "duplicate cable name", &entity);
            }
            if self.line_code(&cable.line_code).is_none() {
                diag.add_error_with_entity(
                    "reference",
                    &format!("unknown line code '{}'", cable.line_code),
                    &entity,
                );
            }
            if normalize_bus_name(&cable.from_bus) == normalize_bus_name(&cable.to_bus) {
                diag.add_warning_with_entity(
                    "topology",
                    "cable starts and ends on the same bus",
                    &entity,
                );
            }
        }

        for building in &self.buildings {
            if building.has_demand && building.connection_id.is_none() {
                diag.add_warning_with_entity(
                    "topology",
                    "building has demand but no e-connection; its loads stay at their defaults",
                    &format!("Building {}", building.name),
                );
            }
        }
        diag
    }
}

/// Load a topology from `.json` or `.toml`.
pub fn load_topology(path: impl AsRef<Path>) -> Result<Topology> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading topology '{}'", path.display()))?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    let topology: Topology = match extension.as_deref() {
        Some("json") => serde_json::from_str(&contents)
            .with_context(|| format!("parsing topology JSON '{}'", path.display()))?,
        Some("toml") => toml::from_str(&contents)
            .with_context(|| format!("parsing topology TOML '{}'", path.display()))?,
        _ => {
            return Err(anyhow!(
                "unsupported topology format '{}'; expected .json or .toml",
                path.display()
            ))
        }
    };
    info!(
        name = topology.name.as_str(),
        cables = topology.cables.len(),
        transformers = topology.transformers.len(),
        buildings = topology.buildings.len(),
        "loaded topology"
    );
    Ok(topology)
}

/// Log diagnostics and fail on errors.
pub fn ensure_valid(topology: &Topology, lv_marker: &str) -> Result<Diagnostics> {
    let diag = topology.validate(lv_marker);
    for issue in &diag.issues {
        warn!("{issue}");
    }
    if diag.has_errors() {
        return Err(anyhow!(
            "topology '{}' is inconsistent: {}",
            topology.name,
            diag.summary()
        ));
    }
    Ok(diag)
}
