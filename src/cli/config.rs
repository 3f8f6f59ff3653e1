//! Process configuration
//!
//! One JSON file carries the listener settings, the export credentials, the
//! database path and the field schema:
//!
//! ```json
//! {
//!   "port": 8080,
//!   "auth": {"username": "admin", "password": "secret"},
//!   "id": "email",
//!   "fields": {
//!     "name":  {"label": "Name",  "validation": "alpha", "required": true},
//!     "email": {"label": "Email", "validation": "email", "required": true}
//!   }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::http_server::config::{default_host, default_port};
use crate::http_server::{BasicCredentials, HttpServerConfig};
use crate::schema::{Schema, SchemaDefinition, SchemaLoader};

use super::errors::{CliError, CliResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Credentials guarding the CSV export
    #[serde(default)]
    pub auth: BasicCredentials,

    /// Embedded database file
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// CORS allowed origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Identity field and field specs
    #[serde(flatten)]
    pub schema: SchemaDefinition,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("config/captured_data.db")
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a JSON document
    pub fn parse(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.port == 0 {
            return Err(CliError::config_error("port must be > 0"));
        }

        if self.db_path.as_os_str().is_empty() {
            return Err(CliError::config_error("db_path must not be empty"));
        }

        Ok(())
    }

    /// Compile the schema section
    pub fn compile_schema(&self, loader: &mut SchemaLoader) -> CliResult<Schema> {
        Ok(loader.compile(&self.schema)?)
    }

    /// Listener settings for the HTTP server
    pub fn http_config(&self) -> HttpServerConfig {
        HttpServerConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
        }
    }
}
