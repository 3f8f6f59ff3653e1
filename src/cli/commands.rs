//! CLI command implementations
//!
//! `serve` boots in a fixed order: config, schema, store, listener. Any
//! failure before the listener is bound aborts the process.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use crate::export::CsvProjector;
use crate::http_server::{AppServices, HttpServer};
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::schema::{Schema, SchemaLoader, TIMESTAMP_FIELD};
use crate::storage::RedbStore;

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port),
        Command::Check { config } => check(&config),
        Command::Export { config, output } => export(&config, output.as_deref()),
    }
}

/// Boot the capture service and serve until the listener fails
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    log_event(Event::BootStart);

    let result = boot_and_serve(config_path, port);
    if let Err(e) = &result {
        log_event_with_fields(
            Event::BootFailed,
            &[("code", e.code_str()), ("reason", e.message())],
        );
    }
    result
}

fn boot_and_serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let (config, schema) = load_config_and_schema(config_path, &mut SchemaLoader::new())?;

    let store = RedbStore::open(&config.db_path)?;

    let mut http_config = config.http_config();
    if let Some(port) = port {
        http_config.port = port;
    }

    let services = AppServices::new(Arc::new(schema), Arc::new(store), config.auth.clone());
    let server = HttpServer::new(http_config, services);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Validate the configuration and report the compiled schema on stdout
pub fn check(config_path: &Path) -> CliResult<()> {
    let mut loader = SchemaLoader::new();

    let (_config, schema) = match load_config_and_schema(config_path, &mut loader) {
        Ok(loaded) => loaded,
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            return Err(e.into_reported());
        }
    };

    let fields: Vec<_> = schema
        .fields()
        .map(|(name, field)| {
            json!({
                "name": name,
                "label": field.label,
                "validation": field.kind.to_string(),
                "required": field.required,
            })
        })
        .collect();

    let columns: Vec<&str> = schema
        .field_names()
        .chain(std::iter::once(TIMESTAMP_FIELD))
        .collect();

    let warnings: Vec<String> = loader.warnings().iter().map(|w| w.to_string()).collect();

    write_response(json!({
        "fields": fields,
        "identity_field": schema.identity_field(),
        "columns": columns,
        "warnings": warnings,
    }))
}

/// Write the CSV export to `output`, or stdout when no file is given
pub fn export(config_path: &Path, output: Option<&Path>) -> CliResult<()> {
    let (config, schema) = load_config_and_schema(config_path, &mut SchemaLoader::new())?;

    let store = RedbStore::open(&config.db_path)?;
    let projector = CsvProjector::new(Arc::new(schema), Arc::new(store));

    let rows = match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                CliError::io_error(format!("Failed to create {}: {}", path.display(), e))
            })?;
            let mut out = BufWriter::new(file);
            let rows = projector.project_to(&mut out)?;
            out.flush()?;
            rows
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let rows = projector.project_to(&mut out)?;
            out.flush()?;
            rows
        }
    };

    log_event_with_fields(
        Event::ExportServed,
        &[("rows", &rows.to_string()), ("via", "cli")],
    );

    Ok(())
}

fn load_config_and_schema(
    config_path: &Path,
    loader: &mut SchemaLoader,
) -> CliResult<(Config, Schema)> {
    let config = Config::load(config_path)?;
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("path", &config_path.display().to_string())],
    );

    let schema = config.compile_schema(loader)?;
    log_event_with_fields(
        Event::SchemaLoaded,
        &[
            ("fields", &schema.len().to_string()),
            ("identity_field", schema.identity_field().unwrap_or("")),
        ],
    );

    Ok((config, schema))
}
