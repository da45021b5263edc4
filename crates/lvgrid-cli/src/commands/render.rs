use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lvgrid_cosim::LoadFlowService;
use lvgrid_io::dss::render_line_codes;
use tracing::info;

use super::load_inputs;

pub fn handle(
    topology_path: &Path,
    out: &Path,
    line_codes: Option<&Path>,
    no_reduce: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let (topology, mut config) = load_inputs(topology_path, config_path)?;
    if no_reduce {
        config.radial_reduction = false;
    }

    // Same initialisation the co-simulation service performs.
    let service = LoadFlowService::initialize(config, &topology)?;
    let script = service.script();
    script.write_to(out)?;
    match service.cut() {
        Some(applied) => println!(
            "Removed line {} between {} and {}",
            applied.line.name, applied.cut.from_bus, applied.cut.to_bus
        ),
        None => println!("Network left unchanged"),
    }
    println!(
        "Wrote {} ({} lines, {} loads)",
        out.display(),
        script.line_elements().count(),
        script.load_count()
    );

    if let Some(path) = line_codes {
        fs::write(path, render_line_codes(&topology.line_codes))
            .with_context(|| format!("writing line codes '{}'", path.display()))?;
        info!(path = %path.display(), codes = topology.line_codes.len(), "wrote line codes");
        println!("Wrote {}", path.display());
    }
    Ok(())
}
