//! CLI module for persondb
//!
//! Provides command-line interface for:
//! - init: Create an empty person log
//! - serve: Load the log and serve the HTTP API
//! - dump: Print the log's records as JSON

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{dump, init, prepare_server, run, run_command, serve};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_response, write_response_to};
