use anyhow::Result;
use lvgrid_cli::cli::ConfigCommands;
use lvgrid_cosim::ServiceConfig;

pub fn handle(command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show { config } => {
            let config = ServiceConfig::load_or_default(config.as_deref())?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}
