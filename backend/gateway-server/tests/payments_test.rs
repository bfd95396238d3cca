#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use gateway_server::app;
use serde_json::{json, Value};
use tracing_subscriber::layer::SubscriberExt;

mod common;
use common::{gateway, post_json, test_config, unreachable_base_url, CONFIGURED_KEY, HEADER_KEY};

fn card_transaction(token: &str) -> Value {
    json!({
        "amount": 500,
        "currency": "USD",
        "order_id": "ord_42",
        "payment_details": { "token": token }
    })
}

#[tokio::test]
async fn authorize_holds_the_charge_and_reports_the_card() {
    let (router, stub) = gateway().await;

    let (status, transaction) =
        post_json(&router, "/payments/authorize", &[], card_transaction("tok_visa")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(transaction["kind"], json!("authorize"));
    assert_eq!(transaction["status"], json!("success"));
    assert_eq!(transaction["authorization"], json!("ch_1"));
    assert!(transaction["authorization_exp"].is_string());
    assert_eq!(transaction["order_id"], json!("ord_42"));

    let details = &transaction["payment_details"];
    assert_eq!(details["gateway"], Value::Null);
    assert_eq!(details["type"], json!("credit_card"));
    assert_eq!(details["avs_result_code"], json!("Y"));
    assert_eq!(details["credit_card_iin"], Value::Null);
    assert_eq!(details["credit_card_company"], json!("Visa"));
    assert_eq!(details["credit_card_number"], json!("**** **** **** 4242"));
    assert_eq!(details["cvv_result_code"], json!("pass"));

    let call = stub.last_call();
    assert_eq!(call.path, "/v1/charges");
    assert_eq!(call.form.get("capture").map(String::as_str), Some("false"));
    assert_eq!(call.form.get("currency").map(String::as_str), Some("usd"));
    assert_eq!(
        call.authorization.as_deref(),
        Some(format!("Bearer {CONFIGURED_KEY}").as_str())
    );
    assert_eq!(call.content_types, vec!["application/x-www-form-urlencoded"]);
}

#[tokio::test]
async fn sale_captures_immediately_and_forwards_optional_fields() {
    let (router, stub) = gateway().await;
    let mut transaction = card_transaction("tok_visa");
    transaction["description"] = json!("Order 42");
    transaction["metadata"] = json!({ "order": 42 });
    transaction["payment_details"]["customer"] = json!("cus_1");

    let (status, transaction) = post_json(&router, "/payments/sale", &[], transaction).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(transaction["kind"], json!("sale"));
    assert_eq!(transaction["status"], json!("success"));
    assert!(transaction.get("authorization_exp").is_none());

    let form = stub.last_call().form;
    assert_eq!(form.get("capture").map(String::as_str), Some("true"));
    assert_eq!(form.get("customer").map(String::as_str), Some("cus_1"));
    assert_eq!(form.get("description").map(String::as_str), Some("Order 42"));
    assert_eq!(form.get("metadata[order]").map(String::as_str), Some("42"));
}

#[tokio::test]
async fn declined_card_resolves_with_a_failed_transaction() {
    let (router, _stub) = gateway().await;

    let (status, transaction) = post_json(
        &router,
        "/payments/sale",
        &[],
        card_transaction("tok_chargeDeclined"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(transaction["status"], json!("failure"));
    assert_eq!(transaction["error_code"], json!("card_declined"));
    assert_eq!(transaction["error_message"], json!("Your card was declined."));
    assert!(transaction.get("authorization").is_none());
}

#[tokio::test]
async fn issuer_decline_code_is_mapped() {
    let (router, _stub) = gateway().await;

    let (_, transaction) = post_json(
        &router,
        "/payments/authorize",
        &[],
        card_transaction("tok_callIssuer"),
    )
    .await;

    assert_eq!(transaction["error_code"], json!("call_issuer"));
}

#[tokio::test]
async fn capture_uses_the_authorization() {
    let (router, stub) = gateway().await;

    let (status, transaction) = post_json(
        &router,
        "/payments/capture",
        &[],
        json!({ "amount": 300, "authorization": "ch_9" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(transaction["kind"], json!("capture"));
    assert_eq!(transaction["status"], json!("success"));
    assert_eq!(transaction["amount"], json!(300));
    assert_eq!(transaction["authorization"], json!("ch_9"));

    let call = stub.last_call();
    assert_eq!(call.path, "/v1/charges/ch_9/capture");
    assert_eq!(call.form.get("amount").map(String::as_str), Some("300"));
}

#[tokio::test]
async fn capture_without_authorization_is_rejected() {
    let (router, stub) = gateway().await;

    let (status, body) =
        post_json(&router, "/payments/capture", &[], json!({ "amount": 300 })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("MISSING_REQUIRED_FIELD"));
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn void_and_refund_create_refunds() {
    let (router, stub) = gateway().await;

    let (_, voided) = post_json(
        &router,
        "/payments/void",
        &[],
        json!({ "authorization": "ch_1" }),
    )
    .await;
    assert_eq!(voided["kind"], json!("void"));
    assert_eq!(voided["status"], json!("success"));
    assert_eq!(voided["amount"], json!(500));
    assert!(!stub.last_call().form.contains_key("amount"));

    let (_, refunded) = post_json(
        &router,
        "/payments/refund",
        &[],
        json!({ "authorization": "ch_1", "amount": 50 }),
    )
    .await;
    assert_eq!(refunded["kind"], json!("refund"));
    assert_eq!(refunded["amount"], json!(50));

    let call = stub.last_call();
    assert_eq!(call.path, "/v1/refunds");
    assert_eq!(call.form.get("charge").map(String::as_str), Some("ch_1"));
    assert_eq!(call.form.get("amount").map(String::as_str), Some("50"));
}

#[tokio::test]
async fn api_key_header_overrides_the_configured_key() {
    let (router, stub) = gateway().await;

    post_json(
        &router,
        "/payments/sale",
        &[("x-api-key", HEADER_KEY)],
        card_transaction("tok_visa"),
    )
    .await;

    assert_eq!(
        stub.last_call().authorization.as_deref(),
        Some(format!("Bearer {HEADER_KEY}").as_str())
    );
}

#[tokio::test]
async fn missing_credentials_are_unauthorized() {
    let stub = common::spawn_stub_provider().await;
    let router = app::router(Arc::new(test_config(&stub.base_url, None, None)));

    let (status, body) =
        post_json(&router, "/payments/sale", &[], card_transaction("tok_visa")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], json!("MISSING_API_KEY"));
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn unreachable_gateway_fails_the_transaction() {
    let base_url = unreachable_base_url().await;
    let router = app::router(Arc::new(test_config(&base_url, Some(CONFIGURED_KEY), None)));

    let (status, transaction) =
        post_json(&router, "/payments/sale", &[], card_transaction("tok_visa")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(transaction["kind"], json!("sale"));
    assert_eq!(transaction["status"], json!("failure"));
    assert_eq!(transaction["error_code"], json!("processing_error"));
    assert!(transaction["error_message"].is_string());
}

#[tokio::test]
async fn unknown_gateway_is_a_bad_request() {
    let (router, stub) = gateway().await;

    let (status, body) = post_json(
        &router,
        "/payments/sale",
        &[("x-gateway", "braintree")],
        card_transaction("tok_visa"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("INVALID_GATEWAY"));
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let (router, _stub) = gateway().await;

    let (status, body) = post_json(
        &router,
        "/payments/sale",
        &[],
        json!({ "amount": "five hundred" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("INVALID_REQUEST_BODY"));
}

/// Collects the names of spans opened while it is the default subscriber
#[derive(Clone, Default)]
struct SpanNames(Arc<Mutex<Vec<String>>>);

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for SpanNames {
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        self.0.lock().unwrap().push(attrs.metadata().name().to_owned());
    }
}

#[tokio::test]
async fn payment_operations_run_in_their_own_span() {
    let spans = SpanNames::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(spans.clone()));
    let (router, _stub) = gateway().await;

    let (status, _) =
        post_json(&router, "/payments/capture", &[], json!({ "amount": 300 })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(spans
        .0
        .lock()
        .unwrap()
        .iter()
        .any(|name| name == "payment_capture"));
}
