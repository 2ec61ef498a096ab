use axum::http::StatusCode;
use serde_json::{Value, json};

use surety_portal::domain::types::Proposal;
use surety_testing::auth::MockSession;
use surety_testing::fixture::Fixture;

use crate::helpers::{broker_one, broker_two, test_server, test_state};

fn ids(body: &Value) -> Vec<u64> {
    body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect()
}

// ── health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_health_and_readiness() {
    let server = test_server(test_state());
    assert_eq!(server.get("/healthz").await.status_code(), StatusCode::OK);

    let res = server.get("/readyz").await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.json::<Value>(), json!({ "status": "ready" }));
    assert!(res.headers().contains_key("x-request-id"));
}

// ── proposals ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_only_own_proposals_for_broker() {
    let server = test_server(test_state());
    let (name, value) = MockSession::broker(broker_one()).cookie_header();

    let res = server.get("/proposals").add_header(name, value).await;
    assert_eq!(res.status_code(), StatusCode::OK);
    let body: Value = res.json();
    assert_eq!(ids(&body), vec![1001, 1002]);
    assert_eq!(body["total"], 2);
    assert_eq!(body["per-page"], 25);
}

#[tokio::test]
async fn should_list_every_proposal_for_underwriter() {
    let server = test_server(test_state());
    let fixture: Vec<Proposal> = Fixture::load_as("services/portal/fixtures/proposals.json");
    let (name, value) = MockSession::underwriter().cookie_header();

    let res = server.get("/proposals").add_header(name, value).await;
    let body: Value = res.json();
    assert_eq!(body["total"], fixture.len());
    assert_eq!(
        ids(&body),
        fixture.iter().map(|p| u64::from(p.id.0)).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn should_paginate_proposals() {
    let server = test_server(test_state());
    let (name, value) = MockSession::admin().cookie_header();

    let res = server
        .get("/proposals")
        .add_query_param("per-page", 2)
        .add_query_param("page", 2)
        .add_header(name, value)
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    let body: Value = res.json();
    assert_eq!(ids(&body), vec![1003, 1004]);
    assert_eq!(body["page"], 2);
    assert_eq!(body["total"], 6);
}

#[tokio::test]
async fn should_reject_non_numeric_page() {
    let server = test_server(test_state());
    let (name, value) = MockSession::admin().cookie_header();

    let res = server
        .get("/proposals")
        .add_query_param("page", "first")
        .add_header(name, value)
        .await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>()["details"][0]["field"], "query");
}

#[tokio::test]
async fn should_hide_other_brokers_proposal() {
    let server = test_server(test_state());

    let (name, value) = MockSession::broker(broker_one()).cookie_header();
    let res = server.get("/proposals/1001").add_header(name, value).await;
    assert_eq!(res.status_code(), StatusCode::OK);
    let body: Value = res.json();
    assert_eq!(body["status"], "approved");
    assert_eq!(body["submitted_at"], "2025-02-03T10:00:00.000Z");

    let (name, value) = MockSession::broker(broker_two()).cookie_header();
    let res = server.get("/proposals/1001").add_header(name, value).await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>()["kind"], "PROPOSAL_NOT_FOUND");
}

#[tokio::test]
async fn should_require_session_for_records() {
    let server = test_server(test_state());
    let res = server.get("/proposals").await;
    assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);

    let res = server
        .get("/policyholders")
        .add_header(
            axum::http::header::COOKIE,
            axum::http::HeaderValue::from_static("surety_session=garbage"),
        )
        .await;
    assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);
}

// ── policyholders ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_only_own_policyholders_for_broker() {
    let server = test_server(test_state());
    let (name, value) = MockSession::broker(broker_two()).cookie_header();

    let res = server.get("/policyholders").add_header(name, value).await;
    let body: Value = res.json();
    assert_eq!(ids(&body), vec![3]);
}

#[tokio::test]
async fn should_get_policyholder_by_id() {
    let server = test_server(test_state());
    let (name, value) = MockSession::underwriter().cookie_header();

    let res = server.get("/policyholders/4").add_header(name, value).await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.json::<Value>()["id"], 4);

    let (name, value) = MockSession::underwriter().cookie_header();
    let res = server.get("/policyholders/77").add_header(name, value).await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
}

// ── brokers ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_broker_once_per_email() {
    let server = test_server(test_state());
    let body = json!({
        "name": "Ada Brook",
        "email": "Ada@Brook.example",
        "company": "Brook Surety",
        "license_number": "BRK-2025-0100"
    });

    let res = server.post("/brokers").json(&body).await;
    assert_eq!(res.status_code(), StatusCode::CREATED);
    let created: Value = res.json();
    assert_eq!(created["email"], "ada@brook.example");
    assert!(created["id"].as_str().is_some());

    let res = server.post("/brokers").json(&body).await;
    assert_eq!(res.status_code(), StatusCode::CONFLICT);
    assert_eq!(res.json::<Value>()["kind"], "BROKER_ALREADY_EXISTS");
}

#[tokio::test]
async fn should_validate_broker_registration() {
    let server = test_server(test_state());
    let res = server
        .post("/brokers")
        .json(&json!({ "name": " ", "email": "not-an-email" }))
        .await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    let details = res.json::<Value>()["details"].as_array().unwrap().len();
    assert_eq!(details, 4);
}

#[tokio::test]
async fn should_list_brokers_for_admin_only() {
    let server = test_server(test_state());

    let (name, value) = MockSession::underwriter().cookie_header();
    let res = server.get("/brokers").add_header(name, value).await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(res.json::<Value>()["kind"], "FORBIDDEN");

    let (name, value) = MockSession::admin().cookie_header();
    let res = server.get("/brokers").add_header(name, value).await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.json::<Value>().as_array().unwrap().len(), 3);
}

// ── offers ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_offers_for_underwriter() {
    let server = test_server(test_state());

    let (name, value) = MockSession::broker(broker_one()).cookie_header();
    let res = server.get("/offers").add_header(name, value).await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);

    let (name, value) = MockSession::underwriter().cookie_header();
    let res = server.get("/offers").add_header(name, value).await;
    assert_eq!(res.status_code(), StatusCode::OK);
    let statuses: Vec<String> = res
        .json::<Value>()
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["status"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(statuses, vec!["pending", "accepted", "pending", "rejected"]);
}
