use std::{future::Future, io, net, sync::Arc};

use axum::{http, routing::get};
use common_utils::consts;
use external_services::shared_metrics as metrics;
use tokio::signal::unix::{signal, SignalKind};
use tower_http::{request_id::MakeRequestUuid, trace as tower_trace};

use crate::{
    configs,
    error::ConfigurationError,
    http::{create_router, AppState},
    logger,
    metrics::HttpMetricsLayer,
    utils,
};

/// Registers the termination signals now and resolves once any of them arrives
fn shutdown_signal(server: &'static str) -> io::Result<impl Future<Output = ()> + Send + 'static> {
    let mut sig_int = signal(SignalKind::interrupt())?;
    let mut sig_term = signal(SignalKind::terminate())?;
    let mut sig_quit = signal(SignalKind::quit())?;
    let mut sig_hup = signal(SignalKind::hangup())?;

    Ok(async move {
        let received = tokio::select! {
            _ = sig_int.recv() => "SIGINT",
            _ = sig_term.recv() => "SIGTERM",
            _ = sig_quit.recv() => "SIGQUIT",
            _ = sig_hup.recv() => "SIGHUP",
        };
        logger::info!(server, signal = received, "shutting down");
    })
}

pub async fn server_builder(config: configs::Config) -> Result<(), ConfigurationError> {
    let socket_addr = config.server.socket_addr()?;
    let shutdown = shutdown_signal("gateway")?;

    logger::info!(%socket_addr, "starting gateway service");

    http_server(Arc::new(config), socket_addr, shutdown).await
}

/// The gateway router with tracing, request id and metrics layers applied
pub fn router(config: Arc<configs::Config>) -> axum::Router {
    let logging_layer = tower_trace::TraceLayer::new_for_http()
        .make_span_with(|request: &axum::extract::Request<_>| {
            utils::record_fields_from_header(request)
        })
        .on_request(tower_trace::DefaultOnRequest::new().level(tracing::Level::INFO))
        .on_response(
            tower_trace::DefaultOnResponse::new()
                .level(tracing::Level::INFO)
                .latency_unit(tower_http::LatencyUnit::Micros),
        )
        .on_failure(
            tower_trace::DefaultOnFailure::new()
                .latency_unit(tower_http::LatencyUnit::Micros)
                .level(tracing::Level::ERROR),
        );

    let request_id_header = http::HeaderName::from_static(consts::X_REQUEST_ID);

    // Layers wrap every route registered before them, last added runs first
    create_router(AppState::new(config))
        .layer(HttpMetricsLayer::new())
        .layer(logging_layer)
        .layer(tower_http::request_id::PropagateRequestIdLayer::new(
            request_id_header.clone(),
        ))
        .layer(tower_http::request_id::SetRequestIdLayer::new(
            request_id_header,
            MakeRequestUuid,
        ))
}

pub async fn http_server(
    config: Arc<configs::Config>,
    socket: net::SocketAddr,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ConfigurationError> {
    let listener = tokio::net::TcpListener::bind(socket).await?;

    axum::serve(listener, router(config).into_make_service())
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    Ok(())
}

async fn render_metrics() -> Result<String, (http::StatusCode, &'static str)> {
    metrics::metrics_handler().await.map_err(|error| {
        tracing::error!(?error, "failed to render metrics");
        (
            http::StatusCode::INTERNAL_SERVER_ERROR,
            "Error fetching metrics",
        )
    })
}

/// Serves the Prometheus registry on its own listener
pub async fn metrics_server_builder(config: configs::Config) -> Result<(), ConfigurationError> {
    let listener = config.metrics.tcp_listener().await?;
    let shutdown = shutdown_signal("metrics")?;

    let router = axum::Router::new().route("/metrics", get(render_metrics));

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
