//! CLI module for formcapture
//!
//! Provides command-line interface for:
//! - serve: Boot the capture service and accept submissions
//! - check: Validate the configuration and print the compiled schema
//! - export: Write the CSV export without starting the server

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, export, run, run_command, serve};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
