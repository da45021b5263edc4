//! Adapter from topology cables to [`CableRecord`]s for the impedance graph.
//!
//! Only inter-joint medium-voltage cables take part in the radial
//! reduction. Low-voltage branch cables are recognised by name: a cable
//! whose name contains the LV marker (case-insensitive) is skipped.

use anyhow::{anyhow, Result};
use lvgrid_core::CableRecord;
use tracing::debug;

use crate::topology::{normalize_bus_name, Topology};

/// True when `name` marks a low-voltage branch cable. An empty marker
/// disables the filter.
pub fn is_low_voltage_cable(name: &str, marker: &str) -> bool {
    if marker.is_empty() {
        return false;
    }
    name.to_lowercase().contains(&marker.to_lowercase())
}

/// Medium-voltage cables in topology order, with impedances per kilometre
/// and lengths in kilometres.
pub fn medium_voltage_cables(topology: &Topology, lv_marker: &str) -> Result<Vec<CableRecord>> {
    let mut records = Vec::new();
    for cable in &topology.cables {
        if is_low_voltage_cable(&cable.name, lv_marker) {
            continue;
        }
        let code = topology.line_code(&cable.line_code).ok_or_else(|| {
            anyhow!(
                "cable '{}' references unknown line code '{}'",
                cable.name,
                cable.line_code
            )
        })?;
        records.push(CableRecord::new(
            cable.name.clone(),
            normalize_bus_name(&cable.from_bus),
            normalize_bus_name(&cable.to_bus),
            code.r1_ohm_per_km.value(),
            code.x1_ohm_per_km.value(),
            cable.length_m.to_kilometers().value(),
        ));
    }
    debug!(
        total = topology.cables.len(),
        medium_voltage = records.len(),
        "filtered medium-voltage cables"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{CableAsset, LineCode};
    use lvgrid_core::{Amperes, ImpedanceGraph, Meters, OhmsPerKm};

    fn topology() -> Topology {
        let cable = |name: &str, a: &str, b: &str, code: &str, len: f64| CableAsset {
            name: name.into(),
            from_bus: a.into(),
            to_bus: b.into(),
            line_code: code.into(),
            length_m: Meters(len),
        };
        Topology {
            name: "cables".into(),
            cables: vec![
                cable("cable1", "joint1Bus", "joint2Bus", "mv", 2000.0),
                cable("LV_cable2", "lv_node1Bus", "lv_node2Bus", "lv", 40.0),
                cable("cable3", "joint2Bus", "joint3Bus", "mv", 500.0),
            ],
            line_codes: vec![
                LineCode {
                    name: "mv".into(),
                    r1_ohm_per_km: OhmsPerKm(0.3),
                    x1_ohm_per_km: OhmsPerKm(0.4),
                    c0_nf_per_km: 0.0,
                    c1_nf_per_km: 0.0,
                    norm_amps: Amperes(300.0),
                },
                LineCode {
                    name: "lv".into(),
                    r1_ohm_per_km: OhmsPerKm(0.5),
                    x1_ohm_per_km: OhmsPerKm(0.1),
                    c0_nf_per_km: 0.0,
                    c1_nf_per_km: 0.0,
                    norm_amps: Amperes(150.0),
                },
            ],
            ..Topology::default()
        }
    }

    #[test]
    fn lv_marker_is_case_insensitive() {
        assert!(is_low_voltage_cable("LV_cable2", "lv"));
        assert!(is_low_voltage_cable("cable_lv", "LV"));
        assert!(!is_low_voltage_cable("cable1", "lv"));
        assert!(!is_low_voltage_cable("LV_cable2", ""));
    }

    #[test]
    fn keeps_medium_voltage_cables_with_normalised_buses() {
        let records = medium_voltage_cables(&topology(), "lv").unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["cable1", "cable3"]);
        assert_eq!(records[0].from_bus, "joint1");
        assert_eq!(records[0].to_bus, "joint2");
        assert!((records[0].length - 2.0).abs() < 1e-12);
    }

    #[test]
    fn weights_are_in_ohms() {
        let records = medium_voltage_cables(&topology(), "lv").unwrap();
        let graph = ImpedanceGraph::from_cables(&records).unwrap();
        let weight = graph.weight_between("joint1", "joint2").unwrap();
        assert!((weight - 1.0).abs() < 1e-12);
        let weight = graph.weight_between("joint2", "joint3").unwrap();
        assert!((weight - 0.25).abs() < 1e-12);
    }

    #[test]
    fn unknown_line_code_is_an_error() {
        let mut topology = topology();
        topology.cables[0].line_code = "nope".into();
        let err = medium_voltage_cables(&topology, "lv").unwrap_err();
        assert!(err.to_string().contains("unknown line code 'nope'"));
    }
}
