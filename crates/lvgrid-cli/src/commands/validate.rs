use std::path::Path;

use anyhow::{anyhow, Result};

use super::load_inputs;

pub fn handle(topology_path: &Path, config_path: Option<&Path>) -> Result<()> {
    let (topology, config) = load_inputs(topology_path, config_path)?;
    let diag = topology.validate(&config.lv_cable_marker);
    println!("Validating {}", topology_path.display());
    print!("{diag}");
    if diag.has_errors() {
        return Err(anyhow!(
            "{} error(s) in '{}'",
            diag.error_count(),
            topology_path.display()
        ));
    }
    Ok(())
}
