use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Readiness {
    pub status: &'static str,
}

/// Handler for `GET /healthz`: liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz`. The portal keeps all state in memory, so being
/// able to answer at all means it is ready.
pub async fn readyz() -> (StatusCode, Json<Readiness>) {
    (StatusCode::OK, Json(Readiness { status: "ready" }))
}
