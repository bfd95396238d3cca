#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use common_utils::{crypto::{HmacSha256, SignMessage}, date_time};
use gateway_server::app;
use serde_json::{json, Value};

mod common;
use common::{gateway, post_json, send, spawn_stub_provider, test_config, CONFIGURED_KEY, WEBHOOK_SECRET};

async fn deliver(router: &Router, body: &Value, signature: Option<String>) -> (StatusCode, Value) {
    let mut request = Request::post("/webhooks/stripe").header("content-type", "application/json");
    if let Some(signature) = signature {
        request = request.header("stripe-signature", signature);
    }
    let request = request
        .body(Body::from(body.to_string()))
        .expect("request");
    let (status, _, value) = send(router, request).await;
    (status, value)
}

fn sign(body: &Value) -> String {
    let timestamp = date_time::now().unix_timestamp();
    let payload = format!("{timestamp}.{body}");
    let signature = HmacSha256
        .sign_message(WEBHOOK_SECRET.as_bytes(), payload.as_bytes())
        .expect("signed");
    format!("t={timestamp},v1={}", hex::encode(signature))
}

fn charge_event() -> Value {
    json!({
        "id": "evt_1",
        "type": "charge.succeeded",
        "created": 1_494_000_000,
        "livemode": false,
        "data": { "object": { "id": "ch_1", "object": "charge" } }
    })
}

async fn verifying_gateway() -> Router {
    let stub = spawn_stub_provider().await;
    app::router(Arc::new(test_config(
        &stub.base_url,
        Some(CONFIGURED_KEY),
        Some(WEBHOOK_SECRET),
    )))
}

#[tokio::test]
async fn charge_event_is_normalized() {
    let (router, _stub) = gateway().await;

    let (status, event) = deliver(&router, &charge_event(), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["id"], json!("evt_1"));
    assert_eq!(event["type"], json!("charge.succeeded"));
    assert_eq!(event["livemode"], json!(false));
    assert_eq!(event["data"]["object"]["last_stripe_event"], json!("2017-05-05T16:00:00.000Z"));
    assert!(event.get("ignored").is_none());
}

#[tokio::test]
async fn dispute_events_are_ignored() {
    let (router, _stub) = gateway().await;
    let mut body = charge_event();
    body["type"] = json!("charge.dispute.created");

    let (status, event) = deliver(&router, &body, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["ignored"], json!(true));
}

#[tokio::test]
async fn event_data_must_be_an_object() {
    let (router, _stub) = gateway().await;
    let mut body = charge_event();
    body["data"] = json!([{ "object": {} }]);

    let (status, error) = deliver(&router, &body, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"]["code"], json!("E_VALIDATION"));
    assert_eq!(
        error["error"]["message"],
        json!("Requires a data attribute as an object")
    );
}

#[tokio::test]
async fn event_data_object_must_be_an_object() {
    let (router, _stub) = gateway().await;
    let mut body = charge_event();
    body["data"] = json!({ "object": "ch_1" });

    let (status, error) = deliver(&router, &body, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error["error"]["message"],
        json!("Requires a data.object attribute as an object")
    );
}

#[tokio::test]
async fn signed_delivery_is_accepted() {
    let router = verifying_gateway().await;
    let body = charge_event();

    let (status, event) = deliver(&router, &body, Some(sign(&body))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["id"], json!("evt_1"));
}

#[tokio::test]
async fn unsigned_or_tampered_deliveries_are_rejected() {
    let router = verifying_gateway().await;
    let body = charge_event();

    let (status, _) = deliver(&router, &body, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut tampered = body.clone();
    tampered["id"] = json!("evt_forged");
    let (status, error) = deliver(&router, &tampered, Some(sign(&body))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error["error"]["message"],
        json!("Webhook signature verification failed")
    );
}

#[tokio::test]
async fn unknown_webhook_gateway_is_rejected() {
    let (router, _stub) = gateway().await;
    let request = Request::post("/webhooks/paypal")
        .body(Body::from(charge_event().to_string()))
        .expect("request");

    let (status, _, body) = send(&router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("INVALID_GATEWAY"));
}

#[tokio::test]
async fn validate_event_fetches_it_from_the_gateway() {
    let (router, stub) = gateway().await;

    let (status, event) =
        post_json(&router, "/events/validate", &[], json!({ "id": "evt_1" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["id"], json!("evt_1"));
    assert_eq!(event["type"], json!("charge.succeeded"));
    assert_eq!(stub.last_call().path, "/v1/events/evt_1");
}

#[tokio::test]
async fn validate_unknown_event_is_not_found() {
    let (router, _stub) = gateway().await;

    let (status, _) =
        post_json(&router, "/events/validate", &[], json!({ "id": "evt_missing" })).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn arbitrary_event_types_do_not_become_metric_labels() {
    let (router, _stub) = gateway().await;
    let mut body = charge_event();
    body["type"] = json!("made.up.type.5d21");

    let (status, event) = deliver(&router, &body, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["ignored"], json!(true));

    let rendered = external_services::shared_metrics::metrics_handler()
        .await
        .expect("metrics render");
    assert!(!rendered.contains("made.up.type.5d21"));
    assert!(rendered.contains(r#"event_type="other""#));
}
