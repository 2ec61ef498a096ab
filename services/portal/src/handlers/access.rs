use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use surety_domain::pin::Pin;

use crate::error::PortalError;
use crate::handlers::Violations;
use crate::state::AppState;
use crate::usecase::access::{
    RequestAccessInput, RequestAccessUseCase, VerifyPinInput, VerifyPinUseCase,
    decode_access_link,
};

// ── POST /access/request ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RequestAccessRequest {
    pub email: Option<String>,
    pub country: Option<String>,
}

#[derive(Serialize)]
pub struct RequestAccessResponse {
    pub email: String,
    pub link: String,
    /// Only present in mock mode; production delivers the PIN out of band.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
}

pub async fn request_access(
    State(state): State<AppState>,
    payload: Result<Json<RequestAccessRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RequestAccessResponse>), PortalError> {
    let Json(body) = payload?;
    let mut violations = Violations::default();
    let email = violations.email("email", body.email);
    violations.into_result()?;
    let Some(email) = email else {
        return Err(PortalError::validation("email", "email is required"));
    };
    let country = body
        .country
        .map(|c| c.trim().to_owned())
        .filter(|c| !c.is_empty());

    let usecase = RequestAccessUseCase {
        access_codes: state.access_code_repo(),
        notifier: state.pin_notifier(),
        codec: state.codec.clone(),
        public_base_url: state.settings.public_base_url.clone(),
        ttl_secs: state.settings.access_code_ttl_secs,
    };
    let out = usecase
        .execute(RequestAccessInput { email, country })
        .await?;

    let body = RequestAccessResponse {
        email: out.email.to_string(),
        link: out.link,
        pin: state.settings.echo_pin.then(|| out.pin.to_string()),
    };
    Ok((StatusCode::CREATED, Json(body)))
}

// ── POST /access/verify ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyPinRequest {
    pub email: Option<String>,
    pub pin: Option<String>,
}

#[derive(Serialize)]
pub struct VerifyPinResponse {
    pub success: bool,
}

pub async fn verify_pin(
    State(state): State<AppState>,
    payload: Result<Json<VerifyPinRequest>, JsonRejection>,
) -> Result<Json<VerifyPinResponse>, PortalError> {
    let Json(body) = payload?;
    let mut violations = Violations::default();
    let email = violations.email("email", body.email);
    let pin = match body.pin {
        None => {
            violations.push("pin", "pin is required");
            None
        }
        Some(raw) => Pin::parse(&raw)
            .map_err(|e| violations.push("pin", e.to_string()))
            .ok(),
    };
    violations.into_result()?;
    let (Some(email), Some(pin)) = (email, pin) else {
        return Err(PortalError::validation("body", "email and pin are required"));
    };

    let usecase = VerifyPinUseCase {
        access_codes: state.access_code_repo(),
    };
    usecase.execute(VerifyPinInput { email, pin })?;
    Ok(Json(VerifyPinResponse { success: true }))
}

// ── GET /access/link/{token} ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AccessLinkResponse {
    pub email: String,
}

pub async fn resolve_access_link(
    State(state): State<AppState>,
    token: Result<Path<String>, PathRejection>,
) -> Result<Json<AccessLinkResponse>, PortalError> {
    let Path(token) = token?;
    let email = decode_access_link(&state.codec, &token)?;
    Ok(Json(AccessLinkResponse {
        email: email.to_string(),
    }))
}
