use axum::{
    Router,
    routing::{get, post},
};

use surety_core::health::{healthz, readyz};
use surety_core::middleware::with_common_layers;

use crate::handlers::{
    access::{request_access, resolve_access_link, verify_pin},
    broker::{list_brokers, register_broker},
    offer::{accept_invitation, issue_invitation, list_offers, reject_invitation, view_invitation},
    policyholder::{get_policyholder, list_policyholders},
    proposal::{get_proposal, list_proposals},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Access codes
        .route("/access/request", post(request_access))
        .route("/access/verify", post(verify_pin))
        .route("/access/link/{token}", get(resolve_access_link))
        // Brokers
        .route("/brokers", post(register_broker).get(list_brokers))
        // Records
        .route("/proposals", get(list_proposals))
        .route("/proposals/{id}", get(get_proposal))
        .route("/policyholders", get(list_policyholders))
        .route("/policyholders/{id}", get(get_policyholder))
        // Offers and invitations
        .route("/offers", get(list_offers))
        .route("/offers/{id}/invitations", post(issue_invitation))
        .route("/invitations/{token}", get(view_invitation))
        .route("/invitations/{token}/accept", post(accept_invitation))
        .route("/invitations/{token}/reject", post(reject_invitation))
        .with_state(state);
    with_common_layers(router)
}
