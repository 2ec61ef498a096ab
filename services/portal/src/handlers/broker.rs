use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use surety_auth_types::identity::Identity;

use crate::domain::types::Broker;
use crate::error::PortalError;
use crate::handlers::Violations;
use crate::state::AppState;
use crate::usecase::broker::{ListBrokersUseCase, RegisterBrokerInput, RegisterBrokerUseCase};

#[derive(Serialize)]
pub struct BrokerResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub company: String,
    pub license_number: String,
    #[serde(serialize_with = "surety_core::serde::to_rfc3339_ms")]
    pub registered_at: chrono::DateTime<chrono::Utc>,
}

impl From<Broker> for BrokerResponse {
    fn from(b: Broker) -> Self {
        Self {
            id: b.id.to_string(),
            name: b.name,
            email: b.email.to_string(),
            company: b.company,
            license_number: b.license_number,
            registered_at: b.registered_at,
        }
    }
}

// ── POST /brokers ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterBrokerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub license_number: Option<String>,
}

pub async fn register_broker(
    State(state): State<AppState>,
    payload: Result<Json<RegisterBrokerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BrokerResponse>), PortalError> {
    let Json(body) = payload?;
    let mut violations = Violations::default();
    let name = violations.text("name", body.name);
    let email = violations.email("email", body.email);
    let company = violations.text("company", body.company);
    let license_number = violations.text("license_number", body.license_number);
    violations.into_result()?;
    let (Some(name), Some(email), Some(company), Some(license_number)) =
        (name, email, company, license_number)
    else {
        return Err(PortalError::validation("body", "incomplete broker details"));
    };

    let usecase = RegisterBrokerUseCase {
        brokers: state.broker_repo(),
    };
    let broker = usecase
        .execute(RegisterBrokerInput {
            name,
            email,
            company,
            license_number,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(broker.into())))
}

// ── GET /brokers ─────────────────────────────────────────────────────────────

pub async fn list_brokers(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<BrokerResponse>>, PortalError> {
    let usecase = ListBrokersUseCase {
        brokers: state.broker_repo(),
    };
    let brokers = usecase.execute(&identity).await?;
    Ok(Json(brokers.into_iter().map(Into::into).collect()))
}
