#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    body::Body,
    extract::{rejection::FormRejection, Form, State},
    http::{HeaderMap, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use domain_types::types::{ConnectorParams, Connectors, Proxy};
use gateway_server::{
    app,
    configs::{Common, Config, Environment, Listener, StripeConfig},
    logger::config::{Level, Log, LogConsole, LogFormat},
};
use hyperswitch_masking::Secret;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const CONFIGURED_KEY: &str = "sk_test_config";
pub const HEADER_KEY: &str = "sk_test_header";
pub const WEBHOOK_SECRET: &str = "whsec_test";

/// One call received by the stub provider
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub content_types: Vec<String>,
    pub form: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct StubProvider {
    pub base_url: String,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl StubProvider {
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> RecordedCall {
        self.calls().pop().expect("the provider was called")
    }
}

/// Serves a minimal Stripe API on an ephemeral local port
pub async fn spawn_stub_provider() -> StubProvider {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub provider");
    let addr = listener.local_addr().expect("stub address");
    let stub = StubProvider {
        base_url: format!("http://{addr}/"),
        calls: Arc::default(),
    };

    let app = Router::new().fallback(stripe_api).with_state(stub.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub provider");
    });
    stub
}

/// Base url of a port nothing listens on
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);
    format!("http://{addr}/")
}

pub fn test_config(base_url: &str, secret_key: Option<&str>, webhook_secret: Option<&str>) -> Config {
    Config {
        common: Common {
            environment: Environment::Development,
        },
        server: Listener {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        metrics: Listener {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        log: Log {
            console: LogConsole {
                enabled: false,
                level: Level::default(),
                log_format: LogFormat::Default,
                filtering_directive: None,
            },
        },
        proxy: Proxy::default(),
        connectors: Connectors {
            stripe: ConnectorParams {
                base_url: base_url.to_string(),
            },
        },
        stripe: StripeConfig {
            secret_key: secret_key.map(|key| Secret::new(key.to_string())),
            webhook_secret: webhook_secret.map(|secret| Secret::new(secret.to_string())),
            webhook_tolerance_secs: None,
        },
    }
}

/// Gateway router wired to a fresh stub provider
pub async fn gateway() -> (Router, StubProvider) {
    let stub = spawn_stub_provider().await;
    let router = app::router(Arc::new(test_config(&stub.base_url, Some(CONFIGURED_KEY), None)));
    (router, stub)
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = router.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json response")
    };
    (status, headers, value)
}

pub async fn post_json(
    router: &Router,
    path: &str,
    headers: &[(&str, &str)],
    body: Value,
) -> (StatusCode, Value) {
    let request = headers
        .iter()
        .fold(
            Request::post(path).header("content-type", "application/json"),
            |builder, (name, value)| builder.header(*name, *value),
        )
        .body(Body::from(body.to_string()))
        .expect("request");
    let (status, _, value) = send(router, request).await;
    (status, value)
}

fn stripe_error(status: StatusCode, error: Value) -> Response {
    (status, Json(json!({ "error": error }))).into_response()
}

fn card(id: &str, customer: Option<&str>) -> Value {
    json!({
        "id": id,
        "object": "card",
        "customer": customer,
        "funding": "credit",
        "brand": "Visa",
        "last4": "4242",
        "exp_month": 12,
        "exp_year": 2030,
        "cvc_check": "pass"
    })
}

fn charge(id: &str, amount: Option<i64>, captured: bool) -> Value {
    json!({
        "id": id,
        "object": "charge",
        "amount": amount.unwrap_or(500),
        "captured": captured,
        "status": "succeeded",
        "source": card("card_1", None)
    })
}

fn customer(id: &str, form: &HashMap<String, String>) -> Value {
    json!({
        "id": id,
        "object": "customer",
        "email": form.get("email"),
        "description": form.get("description")
    })
}

async fn stripe_api(
    State(stub): State<StubProvider>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Response {
    let form = form.map(|Form(form)| form).unwrap_or_default();
    let authorization = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let content_types = headers
        .get_all("content-type")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_owned)
        .collect();
    let path = uri.path().to_owned();
    stub.calls.lock().unwrap().push(RecordedCall {
        method: method.clone(),
        path: path.clone(),
        authorization: authorization.clone(),
        content_types,
        form: form.clone(),
    });

    let known_key = [CONFIGURED_KEY, HEADER_KEY]
        .iter()
        .any(|key| authorization.as_deref() == Some(format!("Bearer {key}").as_str()));
    if !known_key {
        return stripe_error(
            StatusCode::UNAUTHORIZED,
            json!({ "type": "invalid_request_error", "message": "Invalid API Key provided" }),
        );
    }

    let amount = form.get("amount").and_then(|amount| amount.parse().ok());
    let segments: Vec<&str> = path.trim_start_matches("/v1/").split('/').collect();
    let body = match (method.as_str(), segments.as_slice()) {
        ("POST", ["charges"]) => match form.get("source").map(String::as_str) {
            Some("tok_chargeDeclined") => {
                return stripe_error(
                    StatusCode::PAYMENT_REQUIRED,
                    json!({
                        "type": "card_error",
                        "code": "card_declined",
                        "decline_code": "generic_decline",
                        "message": "Your card was declined."
                    }),
                )
            }
            Some("tok_callIssuer") => {
                return stripe_error(
                    StatusCode::PAYMENT_REQUIRED,
                    json!({
                        "type": "card_error",
                        "code": "card_declined",
                        "decline_code": "call_issuer",
                        "message": "Your card was declined."
                    }),
                )
            }
            _ => charge(
                "ch_1",
                amount,
                form.get("capture").map(String::as_str) == Some("true"),
            ),
        },
        ("POST", ["charges", charge_id, "capture"]) => charge(charge_id, amount, true),
        ("POST", ["refunds"]) => json!({
            "id": "re_1",
            "object": "refund",
            "amount": amount.unwrap_or(500),
            "charge": form.get("charge"),
            "status": "succeeded"
        }),
        ("POST", ["customers"]) => customer("cus_1", &form),
        ("GET" | "POST", ["customers", "cus_missing"]) => {
            return stripe_error(
                StatusCode::NOT_FOUND,
                json!({
                    "type": "invalid_request_error",
                    "code": "resource_missing",
                    "message": "No such customer: 'cus_missing'"
                }),
            )
        }
        ("GET" | "POST", ["customers", customer_id]) => customer(customer_id, &form),
        ("POST", ["customers", customer_id, "sources"]) => card("card_1", Some(*customer_id)),
        ("GET", ["customers", customer_id, "sources"]) => json!({
            "object": "list",
            "data": [card("card_1", Some(*customer_id)), card("card_2", Some(*customer_id))]
        }),
        ("GET" | "POST", ["customers", customer_id, "sources", card_id]) => {
            card(card_id, Some(*customer_id))
        }
        ("DELETE", ["customers", _, "sources", card_id]) => json!({
            "id": card_id,
            "object": "card",
            "deleted": *card_id != "card_locked"
        }),
        ("GET", ["events", "evt_missing"]) => {
            return stripe_error(
                StatusCode::NOT_FOUND,
                json!({
                    "type": "invalid_request_error",
                    "code": "resource_missing",
                    "message": "No such event: 'evt_missing'"
                }),
            )
        }
        ("GET", ["events", event_id]) => json!({
            "id": event_id,
            "object": "event",
            "type": "charge.succeeded",
            "created": 1_494_000_000,
            "data": { "object": charge("ch_1", None, true) }
        }),
        _ => {
            return stripe_error(
                StatusCode::NOT_FOUND,
                json!({ "type": "invalid_request_error", "message": "Unrecognized request URL" }),
            )
        }
    };
    Json(body).into_response()
}
