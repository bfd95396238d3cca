#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;
use common::{gateway, post_json};

#[tokio::test]
async fn create_customer_links_the_gateway_customer() {
    let (router, stub) = gateway().await;

    let (status, customer) = post_json(
        &router,
        "/customers/create",
        &[],
        json!({ "email": "jane@example.com", "token": "tok_visa", "account_id": "acct_7" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(customer["gateway"], json!("stripe"));
    assert_eq!(customer["foreign_key"], json!("customer"));
    assert_eq!(customer["foreign_id"], json!("cus_1"));
    assert_eq!(customer["data"]["object"], json!("customer"));
    assert_eq!(customer["account_id"], json!("acct_7"));

    let call = stub.last_call();
    assert_eq!(call.path, "/v1/customers");
    assert_eq!(call.form.get("email").map(String::as_str), Some("jane@example.com"));
    assert_eq!(call.form.get("source").map(String::as_str), Some("tok_visa"));
}

#[tokio::test]
async fn update_and_find_address_the_customer_by_foreign_id() {
    let (router, stub) = gateway().await;

    let (status, updated) = post_json(
        &router,
        "/customers/update",
        &[],
        json!({ "foreign_id": "cus_7", "description": "VIP" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["foreign_id"], json!("cus_7"));
    let call = stub.last_call();
    assert_eq!(call.method, Method::POST);
    assert_eq!(call.path, "/v1/customers/cus_7");
    assert_eq!(call.form.get("description").map(String::as_str), Some("VIP"));

    let (status, found) =
        post_json(&router, "/customers/find", &[], json!({ "foreign_id": "cus_7" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["data"]["id"], json!("cus_7"));
    assert_eq!(stub.last_call().method, Method::GET);
}

#[tokio::test]
async fn unknown_customer_is_not_found() {
    let (router, _stub) = gateway().await;

    let (status, body) = post_json(
        &router,
        "/customers/find",
        &[],
        json!({ "foreign_id": "cus_missing" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"]["message"]
        .as_str()
        .is_some_and(|message| message.contains("cus_missing")));
}

#[tokio::test]
async fn customer_lookups_require_a_foreign_id() {
    let (router, stub) = gateway().await;

    let (status, body) = post_json(&router, "/customers/find", &[], json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("MISSING_REQUIRED_FIELD"));
    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn create_source_saves_the_card_on_the_customer() {
    let (router, stub) = gateway().await;

    let (status, source) = post_json(
        &router,
        "/sources/create",
        &[],
        json!({ "account_foreign_id": "cus_1", "token": "tok_visa" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(source["gateway"], json!("stripe"));
    assert_eq!(source["foreign_key"], json!("source"));
    assert_eq!(source["foreign_id"], json!("card_1"));
    assert_eq!(source["account_foreign_id"], json!("cus_1"));
    assert_eq!(source["payment_details"]["type"], json!("credit_card"));
    assert_eq!(
        source["payment_details"]["credit_card_number"],
        json!("**** **** **** 4242")
    );

    let call = stub.last_call();
    assert_eq!(call.path, "/v1/customers/cus_1/sources");
    assert_eq!(call.form.get("source").map(String::as_str), Some("tok_visa"));
}

#[tokio::test]
async fn update_and_find_source() {
    let (router, stub) = gateway().await;

    let (status, updated) = post_json(
        &router,
        "/sources/update",
        &[],
        json!({ "account_foreign_id": "cus_1", "foreign_id": "card_3", "exp_month": 1, "exp_year": 2031 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["foreign_id"], json!("card_3"));
    let call = stub.last_call();
    assert_eq!(call.path, "/v1/customers/cus_1/sources/card_3");
    assert_eq!(call.form.get("exp_year").map(String::as_str), Some("2031"));

    let (status, found) = post_json(
        &router,
        "/sources/find",
        &[],
        json!({ "account_foreign_id": "cus_1", "foreign_id": "card_3" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["payment_details"]["credit_card_company"], json!("Visa"));
}

#[tokio::test]
async fn source_list_keeps_gateway_order() {
    let (router, stub) = gateway().await;

    let (status, sources) = post_json(
        &router,
        "/customers/sources",
        &[],
        json!({ "foreign_id": "cus_1" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let sources = sources.as_array().expect("list of sources");
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0]["foreign_id"], json!("card_1"));
    assert_eq!(sources[1]["foreign_id"], json!("card_2"));
    assert!(sources
        .iter()
        .all(|source| source["account_foreign_id"] == json!("cus_1")));
    assert_eq!(stub.last_call().path, "/v1/customers/cus_1/sources");
}

#[tokio::test]
async fn remove_source_deletes_the_card() {
    let (router, stub) = gateway().await;

    let (status, removed) = post_json(
        &router,
        "/sources/remove",
        &[],
        json!({ "account_foreign_id": "cus_1", "foreign_id": "card_1" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["foreign_id"], json!("card_1"));
    assert_eq!(stub.last_call().method, Method::DELETE);
}

#[tokio::test]
async fn undeleted_source_is_unprocessable() {
    let (router, _stub) = gateway().await;

    let (status, body) = post_json(
        &router,
        "/sources/remove",
        &[],
        json!({ "account_foreign_id": "cus_1", "foreign_id": "card_locked" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], json!("SOURCE_NOT_DELETED"));
}
