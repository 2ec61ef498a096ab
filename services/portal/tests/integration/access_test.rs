use std::future::IntoFuture;
use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{Value, json};

use surety_auth_types::link_token::TimeLimitedTokenCodec;
use surety_domain::email::Email;
use surety_domain::pin::Pin;
use surety_portal::config::PortalConfig;
use surety_portal::domain::repository::AccessCodeRepository;
use surety_portal::error::PortalError;
use surety_portal::infra::access_codes::MemoryAccessCodeStore;
use surety_portal::infra::fixtures::PortalSeed;
use surety_portal::state::AppState;
use surety_testing::auth::MockSession;
use surety_portal::usecase::access::{
    RequestAccessInput, RequestAccessUseCase, VerifyPinInput, VerifyPinUseCase,
    decode_access_link,
};

use crate::helpers::{
    FailingNotifier, RecordingNotifier, TEST_BASE_URL, TEST_TOKEN_SECRET, test_config,
    test_server, test_state,
};

fn email(s: &str) -> Email {
    Email::parse(s).unwrap()
}

fn codec() -> Arc<TimeLimitedTokenCodec> {
    Arc::new(TimeLimitedTokenCodec::new(TEST_TOKEN_SECRET.as_bytes()))
}

fn request_usecase(
    store: &MemoryAccessCodeStore,
    notifier: &RecordingNotifier,
) -> RequestAccessUseCase<MemoryAccessCodeStore, RecordingNotifier> {
    RequestAccessUseCase {
        access_codes: store.clone(),
        notifier: notifier.clone(),
        codec: codec(),
        public_base_url: TEST_BASE_URL.to_owned(),
        ttl_secs: 600,
    }
}

// ── use case level ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_and_deliver_issued_pin() {
    let store = MemoryAccessCodeStore::new();
    let notifier = RecordingNotifier::default();

    let out = request_usecase(&store, &notifier)
        .execute(RequestAccessInput {
            email: email("broker@example.com"),
            country: Some("NL".to_owned()),
        })
        .await
        .unwrap();

    let stored = store.get(&email("broker@example.com")).unwrap();
    assert_eq!(stored.pin, out.pin);
    assert_eq!(stored.country.as_deref(), Some("NL"));
    assert!(stored.expires_at > chrono::Utc::now());

    let sent = notifier.deliveries();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0.pin, out.pin);
    assert_eq!(sent[0].1, out.link);
    assert!(
        out.link
            .starts_with("https://portal.test/access/verify?token="),
        "unexpected link {}",
        out.link
    );
}

#[tokio::test]
async fn should_embed_email_in_access_link() {
    let store = MemoryAccessCodeStore::new();
    let notifier = RecordingNotifier::default();
    let out = request_usecase(&store, &notifier)
        .execute(RequestAccessInput {
            email: email("broker@example.com"),
            country: None,
        })
        .await
        .unwrap();

    let token = out.link.rsplit('=').next().unwrap();
    let resolved = decode_access_link(&codec(), token).unwrap();
    assert_eq!(resolved, email("broker@example.com"));
}

#[tokio::test]
async fn should_invalidate_previous_pin_on_new_request() {
    let store = MemoryAccessCodeStore::new();
    let notifier = RecordingNotifier::default();
    let usecase = request_usecase(&store, &notifier);

    let first = usecase
        .execute(RequestAccessInput {
            email: email("a@x.com"),
            country: None,
        })
        .await
        .unwrap();
    let second = usecase
        .execute(RequestAccessInput {
            email: email("a@x.com"),
            country: None,
        })
        .await
        .unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&email("a@x.com")).unwrap().pin, second.pin);

    let verify = VerifyPinUseCase {
        access_codes: store.clone(),
    };
    if first.pin != second.pin {
        let stale = verify.execute(VerifyPinInput {
            email: email("a@x.com"),
            pin: first.pin,
        });
        assert!(matches!(stale, Err(PortalError::InvalidCredential)));
    }
    verify
        .execute(VerifyPinInput {
            email: email("a@x.com"),
            pin: second.pin,
        })
        .unwrap();
}

#[tokio::test]
async fn should_keep_earlier_pin_when_delivery_fails() {
    let store = MemoryAccessCodeStore::new();
    store.upsert(surety_portal::domain::types::AccessCodeRecord {
        email: email("a@x.com"),
        pin: Pin::parse("123456").unwrap(),
        country: None,
        expires_at: chrono::Utc::now() + chrono::Duration::minutes(10),
    });
    let usecase = RequestAccessUseCase {
        access_codes: store.clone(),
        notifier: FailingNotifier,
        codec: codec(),
        public_base_url: TEST_BASE_URL.to_owned(),
        ttl_secs: 600,
    };
    let result = usecase
        .execute(RequestAccessInput {
            email: email("a@x.com"),
            country: None,
        })
        .await;
    assert!(matches!(result, Err(PortalError::Internal(_))));

    let verify = VerifyPinUseCase {
        access_codes: store,
    };
    verify
        .execute(VerifyPinInput {
            email: email("a@x.com"),
            pin: Pin::parse("123456").unwrap(),
        })
        .unwrap();
}

#[tokio::test]
async fn should_fail_cleanly_when_ttl_overflows() {
    let store = MemoryAccessCodeStore::new();
    let notifier = RecordingNotifier::default();
    for ttl_secs in [i64::MAX, 10_i64.pow(15)] {
        let usecase = RequestAccessUseCase {
            ttl_secs,
            ..request_usecase(&store, &notifier)
        };
        let result = usecase
            .execute(RequestAccessInput {
                email: email("a@x.com"),
                country: None,
            })
            .await;
        assert!(
            matches!(result, Err(PortalError::Internal(_))),
            "ttl {ttl_secs} gave {result:?}"
        );
    }
    assert!(store.is_empty());
    assert!(notifier.deliveries().is_empty());
}

#[test]
fn should_refuse_to_build_state_with_unusable_ttl() {
    let mut config = test_config(true);
    config.access_code_ttl_secs = 0;
    assert!(AppState::from_config(&config).is_err());

    let mut config = test_config(true);
    config.access_code_ttl_secs = i64::MAX;
    assert!(AppState::from_config(&config).is_err());

    assert!(AppState::from_config(&test_config(true)).is_ok());
}

#[test]
fn should_verify_pin_exactly_once() {
    let store = MemoryAccessCodeStore::new();
    store.upsert(surety_portal::domain::types::AccessCodeRecord {
        email: email("a@x.com"),
        pin: Pin::parse("123456").unwrap(),
        country: None,
        expires_at: chrono::Utc::now() + chrono::Duration::minutes(10),
    });
    let verify = VerifyPinUseCase {
        access_codes: store,
    };
    let input = || VerifyPinInput {
        email: email("a@x.com"),
        pin: Pin::parse("123456").unwrap(),
    };

    verify.execute(input()).unwrap();
    assert!(matches!(
        verify.execute(input()),
        Err(PortalError::InvalidCredential)
    ));
}

#[test]
fn should_reject_unknown_email_as_invalid_credential() {
    let verify = VerifyPinUseCase {
        access_codes: MemoryAccessCodeStore::new(),
    };
    let result = verify.execute(VerifyPinInput {
        email: email("nobody@x.com"),
        pin: Pin::parse("123456").unwrap(),
    });
    assert!(matches!(result, Err(PortalError::InvalidCredential)));
}

// ── HTTP ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_issue_and_verify_pin_over_http() {
    let server = test_server(test_state());

    let res = server
        .post("/access/request")
        .json(&json!({ "email": "Broker@Example.com", "country": "NL" }))
        .await;
    assert_eq!(res.status_code(), StatusCode::CREATED);
    let body: Value = res.json();
    assert_eq!(body["email"], "broker@example.com");
    let pin = body["pin"].as_str().unwrap().to_owned();
    assert_eq!(pin.len(), 6);

    let res = server
        .post("/access/verify")
        .json(&json!({ "email": "broker@example.com", "pin": pin }))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.json::<Value>(), json!({ "success": true }));

    let res = server
        .post("/access/verify")
        .json(&json!({ "email": "broker@example.com", "pin": pin }))
        .await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["kind"], "INVALID_CREDENTIAL");
    assert_eq!(body["error"], "Invalid email or PIN");
}

#[tokio::test]
async fn should_not_echo_pin_outside_mock_mode() {
    let config: PortalConfig = test_config(false);
    let server = test_server(AppState::new(&config, PortalSeed::default()));

    let res = server
        .post("/access/request")
        .json(&json!({ "email": "a@x.com" }))
        .await;
    assert_eq!(res.status_code(), StatusCode::CREATED);
    let body: Value = res.json();
    assert!(body.get("pin").is_none(), "pin leaked: {body}");
    assert!(body["link"].as_str().unwrap().contains("token="));
}

#[tokio::test]
async fn should_answer_wrong_and_unknown_identically() {
    let state = test_state();
    state.access_codes.upsert(surety_portal::domain::types::AccessCodeRecord {
        email: email("a@x.com"),
        pin: Pin::parse("123456").unwrap(),
        country: None,
        expires_at: chrono::Utc::now() + chrono::Duration::minutes(10),
    });
    let server = test_server(state.clone());

    let wrong = server
        .post("/access/verify")
        .json(&json!({ "email": "a@x.com", "pin": "654321" }))
        .await;
    let unknown = server
        .post("/access/verify")
        .json(&json!({ "email": "b@x.com", "pin": "654321" }))
        .await;
    assert_eq!(wrong.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(wrong.json::<Value>(), unknown.json::<Value>());

    // The wrong guess left the record in place.
    let ok = server
        .post("/access/verify")
        .json(&json!({ "email": "A@X.COM", "pin": "123456" }))
        .await;
    assert_eq!(ok.status_code(), StatusCode::OK);
    assert!(state.access_codes.is_empty());
}

#[tokio::test]
async fn should_report_every_missing_field() {
    let server = test_server(test_state());

    let res = server.post("/access/verify").json(&json!({})).await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["kind"], "VALIDATION");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "pin"]);
}

#[tokio::test]
async fn should_reject_malformed_pin_as_validation() {
    let server = test_server(test_state());
    let res = server
        .post("/access/verify")
        .json(&json!({ "email": "a@x.com", "pin": "12ab" }))
        .await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>()["kind"], "VALIDATION");
}

#[tokio::test]
async fn should_reject_non_json_body_as_validation() {
    let server = test_server(test_state());
    let res = server.post("/access/request").text("email=a@x.com").await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>()["kind"], "VALIDATION");
}

#[tokio::test]
async fn should_resolve_access_link_to_email() {
    let server = test_server(test_state());
    let res = server
        .post("/access/request")
        .json(&json!({ "email": "a@x.com" }))
        .await;
    let link = res.json::<Value>()["link"].as_str().unwrap().to_owned();
    let token = link.rsplit('=').next().unwrap();

    let res = server.get(&format!("/access/link/{token}")).await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.json::<Value>(), json!({ "email": "a@x.com" }));

    let res = server.get("/access/link/not-a-token").await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>()["kind"], "TOKEN_INVALID");
}

#[tokio::test]
async fn should_not_accept_invitation_token_as_access_link() {
    let server = test_server(test_state());
    let (name, value) = MockSession::underwriter().cookie_header();
    let res = server
        .post("/offers/501/invitations")
        .add_header(name, value)
        .json(&json!({ "email": "holder@acme.example" }))
        .await;
    assert_eq!(res.status_code(), StatusCode::CREATED);
    let token = res.json::<Value>()["token"].as_str().unwrap().to_owned();

    let res = server.get(&format!("/access/link/{token}")).await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>()["kind"], "TOKEN_INVALID");
}

#[tokio::test]
async fn should_not_accept_access_link_as_invitation() {
    let server = test_server(test_state());
    let res = server
        .post("/access/request")
        .json(&json!({ "email": "a@x.com" }))
        .await;
    let link = res.json::<Value>()["link"].as_str().unwrap().to_owned();
    let token = link.rsplit('=').next().unwrap();

    let res = server.get(&format!("/invitations/{token}")).await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>()["kind"], "TOKEN_INVALID");
}

#[tokio::test]
async fn should_let_one_of_many_concurrent_verifications_win() {
    let state = test_state();
    state.access_codes.upsert(surety_portal::domain::types::AccessCodeRecord {
        email: email("race@x.com"),
        pin: Pin::parse("123456").unwrap(),
        country: None,
        expires_at: chrono::Utc::now() + chrono::Duration::minutes(10),
    });
    let server = test_server(state);

    let attempts = (0..8).map(|_| {
        server
            .post("/access/verify")
            .json(&json!({ "email": "race@x.com", "pin": "123456" }))
            .into_future()
    });
    let results = futures::future::join_all(attempts).await;
    let wins = results
        .iter()
        .filter(|r| r.status_code() == StatusCode::OK)
        .count();
    assert_eq!(wins, 1);
}
