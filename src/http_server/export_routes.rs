//! Export HTTP Routes
//!
//! `/data.csv` serves the CSV projection behind basic auth.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::export::CsvProjector;
use crate::observability::{log_event, log_event_with_fields, Event};

use super::auth::{BasicCredentials, BASIC_CHALLENGE};

/// Shared export state
pub struct ExportState {
    pub projector: CsvProjector,
    pub credentials: BasicCredentials,
}

/// Export routes with shared state
pub fn export_routes(state: Arc<ExportState>) -> Router {
    Router::new()
        .route("/data.csv", get(export_handler))
        .with_state(state)
}

async fn export_handler(State(state): State<Arc<ExportState>>, headers: HeaderMap) -> Response {
    if !state.credentials.verify(&headers) {
        log_event(Event::ExportUnauthorized);
        return (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, BASIC_CHALLENGE)],
            "Unauthorized.\n",
        )
            .into_response();
    }

    let projector = state.projector.clone();
    let result = tokio::task::spawn_blocking(move || projector.project()).await;

    match result {
        Ok(Ok(document)) => {
            log_event(Event::ExportServed);
            ([(header::CONTENT_TYPE, "text/csv")], document).into_response()
        }
        Ok(Err(e)) => {
            log_event_with_fields(
                Event::ExportFailed,
                &[("code", e.code()), ("reason", &e.to_string())],
            );
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, "Export failed.\n").into_response()
        }
        Err(e) => {
            log_event_with_fields(Event::ExportFailed, &[("reason", &e.to_string())]);
            (StatusCode::INTERNAL_SERVER_ERROR, "Export failed.\n").into_response()
        }
    }
}
