//! CLI argument definitions using clap
//!
//! Commands:
//! - persondb init --config <path>
//! - persondb serve --config <path> [--port <port>] [--data-file <path>]
//! - persondb dump --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// persondb - A person registry served over HTTP and persisted to a CSV log
#[derive(Parser, Debug)]
#[command(name = "persondb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty person log containing only the header row
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./persondb.json")]
        config: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./persondb.json")]
        config: PathBuf,

        /// Port to listen on, overriding the config file
        #[arg(long)]
        port: Option<u16>,

        /// Person log to use, overriding the config file
        #[arg(long)]
        data_file: Option<PathBuf>,
    },

    /// Print every person in the log as JSON and exit
    Dump {
        /// Path to configuration file
        #[arg(long, default_value = "./persondb.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
