pub mod cli;

pub use cli::{Cli, Commands, ConfigCommands, GraphCommands};
