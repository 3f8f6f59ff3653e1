//! # formcapture HTTP Server Module
//!
//! Thin axum transport around the capture engine and CSV projector.
//!
//! # Endpoints
//!
//! - `/capture_data` - Submit form fields (any method)
//! - `/data.csv` - CSV export, basic-auth gated
//! - `/health` - Health check

pub mod auth;
pub mod capture_routes;
pub mod config;
pub mod export_routes;
pub mod observability_routes;
pub mod server;

pub use auth::{basic_header_value, BasicCredentials};
pub use capture_routes::CaptureResponse;
pub use config::HttpServerConfig;
pub use server::{AppServices, HttpServer};
