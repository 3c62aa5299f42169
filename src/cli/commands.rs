//! CLI command implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::json;
use tracing::info;

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::write_response;
use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::{init_tracing, Event};
use crate::store::{DurableLog, PersonService};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve {
            config,
            port,
            data_file,
        } => serve(&config, port, data_file),
        Command::Dump { config } => dump(&config),
    }
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    init_tracing(&config.log_level);
    info!(
        event = %Event::ConfigLoaded,
        path = %config_path.display(),
        data_file = %config.data_file.display(),
        "configuration loaded"
    );
    Ok(config)
}

/// Create the person log with only its header row
///
/// Refuses to touch an existing log.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let log = DurableLog::new(&config.data_file);

    if log.exists() {
        return Err(CliError::already_initialized(log.path().display()));
    }

    if let Some(parent) = log.path().parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            CliError::log_error(format!("Failed to create directory {:?}: {}", parent, e))
        })?;
    }
    log.create()?;
    info!(event = %Event::LogCreated, path = %log.path().display(), "person log created");

    write_response(json!({
        "initialized": true,
        "data_file": log.path().display().to_string(),
    }))
}

/// Resolve the effective server settings and open the person service
///
/// Command line overrides win over the config file.
pub fn prepare_server(
    config: &Config,
    port: Option<u16>,
    data_file: Option<PathBuf>,
) -> CliResult<(HttpServerConfig, Arc<PersonService>)> {
    let mut server_config = config.server.clone();
    if let Some(port) = port {
        if port == 0 {
            return Err(CliError::config_error("--port must be > 0"));
        }
        server_config.port = port;
    }

    let data_file = data_file.unwrap_or_else(|| config.data_file.clone());
    let service = PersonService::open(DurableLog::new(data_file))
        .map_err(|e| CliError::boot_failed(format!("Failed to load person log: {}", e)))?;

    Ok((server_config, Arc::new(service)))
}

/// Start the HTTP server and block until shutdown
pub fn serve(config_path: &Path, port: Option<u16>, data_file: Option<PathBuf>) -> CliResult<()> {
    let config = load_config(config_path)?;
    info!(event = %Event::BootStart, version = env!("CARGO_PKG_VERSION"), "starting persondb");

    let (server_config, service) = prepare_server(&config, port, data_file)?;
    let server = HttpServer::with_config(server_config, service);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Print every person in the log and exit
pub fn dump(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let service = PersonService::open(DurableLog::new(&config.data_file))?;
    write_response(serde_json::to_value(service.list()?)?)
}
