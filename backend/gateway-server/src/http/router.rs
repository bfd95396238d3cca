use axum::{
    routing::{get, post},
    Router,
};

use super::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/payments/authorize", post(handlers::payments::authorize))
        .route("/payments/sale", post(handlers::payments::sale))
        .route("/payments/capture", post(handlers::payments::capture))
        .route("/payments/void", post(handlers::payments::void))
        .route("/payments/refund", post(handlers::payments::refund))
        // Customer and saved source routes
        .route("/customers/create", post(handlers::customers::create_customer))
        .route("/customers/update", post(handlers::customers::update_customer))
        .route("/customers/find", post(handlers::customers::find_customer))
        .route(
            "/customers/sources",
            post(handlers::customers::get_customer_sources),
        )
        .route(
            "/sources/create",
            post(handlers::customers::create_customer_source),
        )
        .route(
            "/sources/update",
            post(handlers::customers::update_customer_source),
        )
        .route(
            "/sources/find",
            post(handlers::customers::find_customer_source),
        )
        .route(
            "/sources/remove",
            post(handlers::customers::remove_customer_source),
        )
        // Gateway events
        .route("/webhooks/{gateway}", post(handlers::webhooks::webhook))
        .route("/events/validate", post(handlers::webhooks::validate_event))
        .with_state(state)
}
