use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lvgrid", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Select the cable that makes the medium-voltage network radial
    Reduce {
        /// Topology description (.json or .toml)
        topology: PathBuf,
        /// Source bus (defaults to the configured or first import bus)
        #[arg(long)]
        source: Option<String>,
        /// Service configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the cut as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render the circuit script for the power-flow engine
    Render {
        /// Topology description (.json or .toml)
        topology: PathBuf,
        /// Output script path
        #[arg(short, long, default_value = "Main.dss")]
        out: PathBuf,
        /// Also write the line code library to this path
        #[arg(long)]
        line_codes: Option<PathBuf>,
        /// Keep the meshed network (skip the radial cut)
        #[arg(long)]
        no_reduce: bool,
        /// Service configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Check a topology for inconsistencies
    Validate {
        /// Topology description (.json or .toml)
        topology: PathBuf,
        /// Service configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Medium-voltage graph utilities
    Graph {
        #[command(subcommand)]
        command: GraphCommands,
    },
    /// Service configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum GraphCommands {
    /// Graph stats summary
    Stats {
        topology: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Find islands in the cable graph
    Islands {
        topology: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Emit the island of every bus
        #[arg(long)]
        emit: bool,
    },
    /// Export the graph
    Export {
        topology: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output format (graphviz or dot)
        #[arg(long, default_value = "graphviz")]
        format: String,
        /// Optional output file path
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
