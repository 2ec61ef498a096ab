use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// A single rejected input field, reported in the `details` array of a
/// validation error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Wire shape of every error response: `{"kind", "error", "details"?}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub kind: &'a str,
    pub error: &'a str,
    #[serde(skip_serializing_if = "no_details")]
    pub details: &'a [FieldViolation],
}

fn no_details(details: &&[FieldViolation]) -> bool {
    details.is_empty()
}

pub fn error_response(
    status: StatusCode,
    kind: &str,
    message: &str,
    details: &[FieldViolation],
) -> Response {
    let body = ErrorBody {
        kind,
        error: message,
        details,
    };
    (status, Json(body)).into_response()
}

/// Body returned by the catch-panic layer. The panic payload is logged, never
/// sent to the client.
pub fn panic_response(payload: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    ::tracing::error!(panic = detail, kind = "INTERNAL", "handler panicked");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL",
        "internal error",
        &[],
    )
}
