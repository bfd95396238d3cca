use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use axum::extract::MatchedPath;
use common_utils::consts;
use connector_integration::types::ConnectorEnum;
use domain_types::utils::ForeignTryFrom;
use external_services::shared_metrics::{
    HTTP_SERVER_REQUESTS_SUCCESSFUL, HTTP_SERVER_REQUESTS_TOTAL, HTTP_SERVER_REQUEST_LATENCY,
};
use http::{Request, Response};
use tower::{Layer, Service};

/// Label used when the gateway header names no known connector
const UNKNOWN_GATEWAY: &str = "unknown";
/// Path label for requests no route matched
const UNMATCHED_PATH: &str = "unmatched";

/// Records request counts and latency per route and gateway
#[derive(Clone, Debug)]
pub struct HttpMetricsLayer;

#[allow(clippy::new_without_default)]
impl HttpMetricsLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for HttpMetricsLayer {
    type Service = HttpMetricsService<S>;

    fn layer(&self, service: S) -> Self::Service {
        HttpMetricsService::new(service)
    }
}

#[derive(Clone)]
pub struct HttpMetricsService<S> {
    inner: S,
}

impl<S> HttpMetricsService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for HttpMetricsService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let start_time = Instant::now();
        let method = req.method().to_string();
        let path = path_label(&req);
        let gateway = gateway_label(&req);

        HTTP_SERVER_REQUESTS_TOTAL
            .with_label_values(&[&method, &path, &gateway])
            .inc();

        Box::pin(async move {
            let result = inner.call(req).await;

            if let Ok(response) = &result {
                if response.status().is_success() {
                    HTTP_SERVER_REQUESTS_SUCCESSFUL
                        .with_label_values(&[&method, &path, &gateway])
                        .inc();
                }
            }
            HTTP_SERVER_REQUEST_LATENCY
                .with_label_values(&[&method, &path, &gateway])
                .observe(start_time.elapsed().as_secs_f64());

            result
        })
    }
}

/// Route template of the request, never the raw path
fn path_label<B>(req: &Request<B>) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNMATCHED_PATH.to_owned(), |matched| matched.as_str().to_owned())
}

fn gateway_label<B>(req: &Request<B>) -> String {
    match req
        .headers()
        .get(consts::X_GATEWAY)
        .and_then(|value| value.to_str().ok())
    {
        Some(gateway) => ConnectorEnum::foreign_try_from(gateway)
            .map(|connector| connector.to_string())
            .unwrap_or_else(|_| UNKNOWN_GATEWAY.to_owned()),
        None => ConnectorEnum::Stripe.to_string(),
    }
}
