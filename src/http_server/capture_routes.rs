//! Capture HTTP Routes
//!
//! `/capture_data` accepts urlencoded form fields (body first, then query
//! string; the first value per name wins) and answers with
//! `{"success": bool, "error_fields": [...]}`. A request without a form
//! content type is read from the query string alone; a form body that cannot
//! be read is refused with the extractor's status.

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Form, Query, State},
    http::StatusCode,
    routing::any,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::capture::{CaptureEngine, CaptureOutcome, SubmittedValues};
use crate::observability::{log_event_with_fields, Event};

/// Capture routes with shared engine
pub fn capture_routes(engine: Arc<CaptureEngine>) -> Router {
    Router::new()
        .route("/capture_data", any(capture_handler))
        .with_state(engine)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureResponse {
    pub success: bool,
    /// Never null; empty when nothing failed
    pub error_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<CaptureOutcome> for CaptureResponse {
    fn from(outcome: CaptureOutcome) -> Self {
        Self {
            success: outcome.accepted,
            error_fields: outcome.invalid_fields,
            error: None,
        }
    }
}

impl CaptureResponse {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            error_fields: Vec::new(),
            error: Some(message),
        }
    }
}

async fn capture_handler(
    State(engine): State<Arc<CaptureEngine>>,
    Query(query): Query<Vec<(String, String)>>,
    body: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> (StatusCode, Json<CaptureResponse>) {
    let body_pairs = match body {
        Ok(Form(pairs)) => pairs,
        Err(FormRejection::InvalidFormContentType(_)) => Vec::new(),
        Err(rejection) => {
            let reason = rejection.body_text();
            log_event_with_fields(
                Event::CaptureBodyRejected,
                &[("status", rejection.status().as_str()), ("reason", &reason)],
            );
            return (rejection.status(), Json(CaptureResponse::failure(reason)));
        }
    };
    let submitted = SubmittedValues::from_pairs(body_pairs.into_iter().chain(query));

    // redb writes block on the single write transaction
    let result = tokio::task::spawn_blocking(move || engine.capture(&submitted)).await;

    match result {
        Ok(Ok(outcome)) => (StatusCode::OK, Json(CaptureResponse::from(outcome))),
        Ok(Err(e)) => {
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(CaptureResponse::failure(e.to_string())))
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(CaptureResponse::failure(format!("capture task failed: {}", e))),
        ),
    }
}
