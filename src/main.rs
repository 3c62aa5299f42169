//! persondb CLI entry point
//!
//! This is a minimal entrypoint that parses arguments and dispatches to
//! `cli::run`, printing errors to stderr and exiting non-zero on failure.

use persondb::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
