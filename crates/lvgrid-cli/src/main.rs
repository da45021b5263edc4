use std::process::ExitCode;

use clap::Parser;
use lvgrid_cli::cli::{Cli, Commands};
use tracing::error;
use tracing_subscriber::FmtSubscriber;

mod commands;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {err}");
        return ExitCode::FAILURE;
    }

    let result = match &cli.command {
        Commands::Reduce {
            topology,
            source,
            config,
            json,
        } => commands::reduce::handle(topology, source.as_deref(), config.as_deref(), *json),
        Commands::Render {
            topology,
            out,
            line_codes,
            no_reduce,
            config,
        } => commands::render::handle(
            topology,
            out,
            line_codes.as_deref(),
            *no_reduce,
            config.as_deref(),
        ),
        Commands::Validate { topology, config } => {
            commands::validate::handle(topology, config.as_deref())
        }
        Commands::Graph { command } => commands::graph::handle(command),
        Commands::Config { command } => commands::config::handle(command),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
