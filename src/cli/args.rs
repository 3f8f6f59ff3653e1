//! CLI argument definitions using clap
//!
//! Commands:
//! - formcapture serve --config <path> [--port <n>]
//! - formcapture check --config <path>
//! - formcapture export --config <path> [--output <file>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// formcapture - schema-driven form capture with CSV export
#[derive(Parser, Debug)]
#[command(name = "formcapture")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP capture service
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./config/config.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate the configuration and schema, then exit
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./config/config.json")]
        config: PathBuf,
    },

    /// Write the CSV export without starting the server
    Export {
        /// Path to configuration file
        #[arg(long, default_value = "./config/config.json")]
        config: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
