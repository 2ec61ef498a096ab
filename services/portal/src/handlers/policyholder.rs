use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use serde::Serialize;

use surety_auth_types::identity::Identity;
use surety_domain::id::PolicyholderId;
use surety_domain::pagination::{Page, PageRequest};

use crate::domain::types::Policyholder;
use crate::error::PortalError;
use crate::state::AppState;
use crate::usecase::policyholder::{GetPolicyholderUseCase, ListPolicyholdersUseCase};

#[derive(Serialize)]
pub struct PolicyholderResponse {
    pub id: u32,
    pub broker_id: String,
    pub name: String,
    pub registration_number: String,
    pub country: String,
    pub contact_email: String,
}

impl From<Policyholder> for PolicyholderResponse {
    fn from(p: Policyholder) -> Self {
        Self {
            id: p.id.0,
            broker_id: p.broker_id.to_string(),
            name: p.name,
            registration_number: p.registration_number,
            country: p.country,
            contact_email: p.contact_email.to_string(),
        }
    }
}

// ── GET /policyholders ───────────────────────────────────────────────────────

pub async fn list_policyholders(
    identity: Identity,
    State(state): State<AppState>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<Page<PolicyholderResponse>>, PortalError> {
    let Query(page) = query?;
    let usecase = ListPolicyholdersUseCase {
        policyholders: state.policyholder_repo(),
    };
    let page = usecase.execute(&identity, page).await?;
    Ok(Json(page.map(Into::into)))
}

// ── GET /policyholders/{id} ──────────────────────────────────────────────────

pub async fn get_policyholder(
    identity: Identity,
    State(state): State<AppState>,
    id: Result<Path<u32>, PathRejection>,
) -> Result<Json<PolicyholderResponse>, PortalError> {
    let Path(id) = id?;
    let usecase = GetPolicyholderUseCase {
        policyholders: state.policyholder_repo(),
    };
    let holder = usecase.execute(&identity, PolicyholderId(id)).await?;
    Ok(Json(holder.into()))
}
