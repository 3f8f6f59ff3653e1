//! formcapture - schema-driven form capture with CSV export
//!
//! Submissions arriving at `/capture_data` are validated against a field
//! schema loaded from configuration and persisted to an embedded key-value
//! store. `/data.csv` projects every stored record into a CSV document behind
//! HTTP basic auth.

pub mod capture;
pub mod cli;
pub mod export;
pub mod http_server;
pub mod observability;
pub mod schema;
pub mod storage;
