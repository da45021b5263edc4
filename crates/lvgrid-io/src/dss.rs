//! OpenDSS circuit script model.
//!
//! The script is kept as typed lines until it is rendered, so later steps
//! (the radial reduction in particular) can edit elements instead of
//! patching text.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lvgrid_core::{Kilovolts, Meters};
use serde::{Deserialize, Serialize};

use crate::topology::{normalize_bus_name, LineCode, Topology};

/// Rendering options that are not part of the topology itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptOptions {
    pub base_frequency_hz: f64,
    pub line_code_file: String,
    pub transformer_code_file: String,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            base_frequency_hz: 50.0,
            line_code_file: "LineCode.dss".to_string(),
            transformer_code_file: "XFMRCode.dss".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// The first source defines the circuit itself.
    Circuit,
    Vsource,
}

/// A four-wire cable between two buses.
#[derive(Debug, Clone, PartialEq)]
pub struct LineElement {
    pub name: String,
    pub from_bus: String,
    pub to_bus: String,
    /// Neutral terminal on the sending end: 0 (grounded) directly behind a
    /// transformer secondary, 4 otherwise.
    pub from_neutral: u8,
    pub line_code: String,
    pub length: Meters,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptLine {
    Blank,
    Comment(String),
    Command(String),
    Source {
        kind: SourceKind,
        name: String,
        base_kv: Kilovolts,
        bus: String,
    },
    Transformer {
        name: String,
        code: String,
        primary_bus: String,
        secondary_bus: String,
        primary_kv: Kilovolts,
        secondary_kv: Kilovolts,
    },
    Line(LineElement),
    /// Single-phase wye load of a building, one per phase.
    Load { building: String, phase: u8 },
    VoltageBases(Vec<f64>),
}

impl fmt::Display for ScriptLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptLine::Blank => Ok(()),
            ScriptLine::Comment(text) => write!(f, "! {text}"),
            ScriptLine::Command(text) => f.write_str(text),
            ScriptLine::Source {
                kind,
                name,
                base_kv,
                bus,
            } => {
                let element = match kind {
                    SourceKind::Circuit => "circuit",
                    SourceKind::Vsource => "Vsource",
                };
                write!(
                    f,
                    "New {element}.{name} phases=3 pu=1.0 basekv={} bus1={bus}",
                    base_kv.value()
                )
            }
            ScriptLine::Transformer {
                name,
                code,
                primary_bus,
                secondary_bus,
                primary_kv,
                secondary_kv,
            } => write!(
                f,
                "New Transformer.{name} Xfmrcode={code} Buses=[{primary_bus}  {secondary_bus}.1.2.3] kVs=[{} {}]",
                primary_kv.value(),
                secondary_kv.value()
            ),
            ScriptLine::Line(line) => write!(
                f,
                "New Line.{} Phases=4 Bus1={}.1.2.3.{} Bus2={}.1.2.3.4 LineCode={} Length={} Units=m",
                line.name,
                line.from_bus,
                line.from_neutral,
                line.to_bus,
                line.line_code,
                line.length.value()
            ),
            ScriptLine::Load { building, phase } => write!(
                f,
                "New Load.{building}_Ph{phase} Bus1=Connection{building}.{phase}.4 Phases=1 Conn=wye Model=1 kV=0.230 kW=1 PF=1.0 Vmaxpu=1.5 Vminpu=0.60"
            ),
            ScriptLine::VoltageBases(bases) => {
                let joined = bases
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "Set VoltageBases = [{joined}]")
            }
        }
    }
}

/// Ordered circuit description consumed by the power-flow engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CircuitScript {
    lines: Vec<ScriptLine>,
}

impl CircuitScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: ScriptLine) {
        self.lines.push(line);
    }

    /// Build the full script for a topology.
    pub fn from_topology(topology: &Topology, options: &ScriptOptions) -> Self {
        let network = topology.network_name();
        let mut script = CircuitScript::new();
        let mut voltage_bases = Vec::new();

        script.push(ScriptLine::Command("Clear".into()));
        script.push(ScriptLine::Blank);
        script.push(ScriptLine::Command(format!(
            "Set DefaultBaseFrequency={}",
            options.base_frequency_hz
        )));
        script.push(ScriptLine::Blank);
        script.push(ScriptLine::Comment("Swing or Source Bar".into()));
        for (position, import) in topology.imports.iter().enumerate() {
            voltage_bases.push(import.voltage_kv.value());
            let kind = if position == 0 {
                SourceKind::Circuit
            } else {
                SourceKind::Vsource
            };
            script.push(ScriptLine::Source {
                kind,
                name: format!("{network}_{}", position + 1),
                base_kv: import.voltage_kv,
                bus: normalize_bus_name(&import.bus).to_string(),
            });
        }

        script.push(ScriptLine::Blank);
        script.push(ScriptLine::Comment("Trafo XFMRCodes".into()));
        script.push(ScriptLine::Command(format!(
            "Redirect {}",
            options.transformer_code_file
        )));
        script.push(ScriptLine::Blank);
        script.push(ScriptLine::Comment("Trafo".into()));
        for transformer in &topology.transformers {
            voltage_bases.push(transformer.voltage_secondary_kv.value());
            script.push(ScriptLine::Transformer {
                name: transformer.name.clone(),
                code: transformer.code.clone(),
                primary_bus: normalize_bus_name(&transformer.primary_bus).to_string(),
                secondary_bus: normalize_bus_name(&transformer.secondary_bus).to_string(),
                primary_kv: transformer.voltage_primary_kv,
                secondary_kv: transformer.voltage_secondary_kv,
            });
        }

        script.push(ScriptLine::Blank);
        script.push(ScriptLine::Comment("LineCodes".into()));
        script.push(ScriptLine::Command(format!(
            "Redirect {}",
            options.line_code_file
        )));
        script.push(ScriptLine::Blank);
        script.push(ScriptLine::Comment("Lines".into()));
        let secondary = topology.secondary_buses();
        for cable in &topology.cables {
            let from_bus = normalize_bus_name(&cable.from_bus).to_string();
            let from_neutral = if secondary.contains(&from_bus) { 0 } else { 4 };
            script.push(ScriptLine::Line(LineElement {
                name: cable.name.clone(),
                from_bus,
                to_bus: normalize_bus_name(&cable.to_bus).to_string(),
                from_neutral,
                line_code: cable.line_code.clone(),
                length: cable.length_m,
            }));
        }

        script.push(ScriptLine::Blank);
        script.push(ScriptLine::Comment("Load Definitions".into()));
        for building in topology.buildings.iter().filter(|b| b.has_demand) {
            for phase in 1..=3 {
                script.push(ScriptLine::Load {
                    building: building.name.clone(),
                    phase,
                });
            }
        }

        script.push(ScriptLine::Blank);
        script.push(ScriptLine::Comment("Final Configurations".into()));
        script.push(ScriptLine::VoltageBases(voltage_bases));
        script.push(ScriptLine::Command("CalcVoltageBases".into()));
        script.push(ScriptLine::Blank);
        script.push(ScriptLine::Comment("Solve".into()));
        script.push(ScriptLine::Command("Set mode=snapshot".into()));
        script
    }

    pub fn lines(&self) -> &[ScriptLine] {
        &self.lines
    }

    pub fn line_elements(&self) -> impl Iterator<Item = &LineElement> {
        self.lines.iter().filter_map(|line| match line {
            ScriptLine::Line(element) => Some(element),
            _ => None,
        })
    }

    /// Number of load elements, in the order the engine enumerates them.
    pub fn load_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| matches!(line, ScriptLine::Load { .. }))
            .count()
    }

    /// Remove the line element named `name`.
    pub fn remove_line(&mut self, name: &str) -> Option<LineElement> {
        let position = self.lines.iter().position(|line| match line {
            ScriptLine::Line(element) => element.name == name,
            _ => false,
        })?;
        match self.lines.remove(position) {
            ScriptLine::Line(element) => Some(element),
            _ => None,
        }
    }

    pub fn render(&self) -> String {
        let mut output = String::new();
        for line in &self.lines {
            output.push_str(&line.to_string());
            output.push('\n');
        }
        output
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.render())
            .with_context(|| format!("writing circuit script '{}'", path.display()))
    }
}

/// Companion line code file referenced by the main script.
pub fn render_line_codes(codes: &[LineCode]) -> String {
    let mut output = String::new();
    for code in codes {
        output.push_str(&format!(
            "New LineCode.{} nphases=4 R1={} X1={} C0={} C1={} Units=km NormAmps={}\n",
            code.name,
            code.r1_ohm_per_km.value(),
            code.x1_ohm_per_km.value(),
            code.c0_nf_per_km,
            code.c1_nf_per_km,
            code.norm_amps.value()
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{Building, CableAsset, ImportAsset, TransformerAsset};
    use lvgrid_core::{Amperes, OhmsPerKm};

    fn topology() -> Topology {
        Topology {
            name: "MV energy system".into(),
            imports: vec![
                ImportAsset {
                    name: "grid".into(),
                    voltage_kv: Kilovolts(10.0),
                    bus: "joint1Bus".into(),
                },
                ImportAsset {
                    name: "backup".into(),
                    voltage_kv: Kilovolts(10.0),
                    bus: "joint3Bus".into(),
                },
            ],
            transformers: vec![TransformerAsset {
                name: "transformer1".into(),
                code: "400kVA".into(),
                primary_bus: "joint2Bus".into(),
                secondary_bus: "lv_node1Bus".into(),
                voltage_primary_kv: Kilovolts(10.0),
                voltage_secondary_kv: Kilovolts(0.4),
            }],
            cables: vec![
                CableAsset {
                    name: "cable1".into(),
                    from_bus: "joint1Bus".into(),
                    to_bus: "joint2Bus".into(),
                    line_code: "mv".into(),
                    length_m: Meters(350.0),
                },
                CableAsset {
                    name: "lv_cable1".into(),
                    from_bus: "lv_node1Bus".into(),
                    to_bus: "lv_node2Bus".into(),
                    line_code: "lv".into(),
                    length_m: Meters(25.5),
                },
            ],
            buildings: vec![
                Building {
                    name: "home1".into(),
                    connection_id: Some("c-1".into()),
                    has_demand: true,
                },
                Building {
                    name: "garage".into(),
                    connection_id: None,
                    has_demand: false,
                },
            ],
            line_codes: vec![],
        }
    }

    #[test]
    fn renders_sources_transformers_lines_and_loads() {
        let script = CircuitScript::from_topology(&topology(), &ScriptOptions::default());
        let text = script.render();

        assert!(text.starts_with("Clear\n"));
        assert!(text.contains("Set DefaultBaseFrequency=50\n"));
        assert!(text
            .contains("New circuit.MV_energy_system_1 phases=3 pu=1.0 basekv=10 bus1=joint1\n"));
        assert!(text
            .contains("New Vsource.MV_energy_system_2 phases=3 pu=1.0 basekv=10 bus1=joint3\n"));
        assert!(text.contains("Redirect XFMRCode.dss\n"));
        assert!(text.contains(
            "New Transformer.transformer1 Xfmrcode=400kVA Buses=[joint2  lv_node1.1.2.3] kVs=[10 0.4]\n"
        ));
        assert!(text.contains(
            "New Line.cable1 Phases=4 Bus1=joint1.1.2.3.4 Bus2=joint2.1.2.3.4 LineCode=mv Length=350 Units=m\n"
        ));
        assert!(text.contains(
            "New Line.lv_cable1 Phases=4 Bus1=lv_node1.1.2.3.0 Bus2=lv_node2.1.2.3.4 LineCode=lv Length=25.5 Units=m\n"
        ));
        assert!(text.contains("New Load.home1_Ph3 Bus1=Connectionhome1.3.4 Phases=1"));
        assert!(!text.contains("garage"));
        assert!(text.contains("Set VoltageBases = [10, 10, 0.4]\n"));
        assert!(text.ends_with("CalcVoltageBases\n\n! Solve\nSet mode=snapshot\n"));
        assert_eq!(script.load_count(), 3);
    }

    #[test]
    fn removes_line_by_name() {
        let mut script = CircuitScript::from_topology(&topology(), &ScriptOptions::default());
        assert_eq!(script.line_elements().count(), 2);

        let removed = script.remove_line("cable1").unwrap();
        assert_eq!(removed.name, "cable1");
        assert_eq!((removed.from_bus.as_str(), removed.to_bus.as_str()), ("joint1", "joint2"));
        assert_eq!(script.line_elements().count(), 1);
        assert!(!script.render().contains("New Line.cable1 "));
        assert!(script.remove_line("cable1").is_none());
        assert!(script.remove_line("missing").is_none());
    }

    #[test]
    fn custom_redirect_targets() {
        let options = ScriptOptions {
            base_frequency_hz: 60.0,
            line_code_file: "codes/lines.dss".into(),
            transformer_code_file: "codes/trafos.dss".into(),
        };
        let text = CircuitScript::from_topology(&topology(), &options).render();
        assert!(text.contains("Set DefaultBaseFrequency=60\n"));
        assert!(text.contains("Redirect codes/lines.dss\n"));
        assert!(text.contains("Redirect codes/trafos.dss\n"));
    }

    #[test]
    fn line_code_file() {
        let text = render_line_codes(&[LineCode {
            name: "mv".into(),
            r1_ohm_per_km: OhmsPerKm(0.125),
            x1_ohm_per_km: OhmsPerKm(0.08),
            c0_nf_per_km: 0.0,
            c1_nf_per_km: 400.0,
            norm_amps: Amperes(360.0),
        }]);
        assert_eq!(
            text,
            "New LineCode.mv nphases=4 R1=0.125 X1=0.08 C0=0 C1=400 Units=km NormAmps=360\n"
        );
    }
}
