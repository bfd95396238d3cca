use std::{str::FromStr, time::Duration};

use common_utils::{
    request::{Headers, Method, Request, RequestContent},
    CustomResult,
};
use domain_types::{
    connector_flow::FlowName,
    errors::{ApiClientError, ConnectorError},
    router_data_v2::RouterDataV2,
    router_response_types::Response,
    types::Proxy,
};
use error_stack::{report, ResultExt};
use hyperswitch_masking::{ErasedMaskSerialize, ExposeInterface, Maskable};
use interfaces::connector_integration_v2::BoxedConnectorIntegrationV2;
use once_cell::sync::OnceCell;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{field::Empty, Instrument};

use crate::shared_metrics as metrics;

const MASKED_HEADER_VALUE: &str = "*** alloc::string::String ***";

/// Builds the connector request for one flow, sends it and folds the answer back into the
/// router data. Provider errors land in `router_data.response`. A body that cannot be encoded
/// is returned as `RequestEncodingFailed` and transport failures as `ProcessingStepFailed`.
pub async fn execute_connector_processing_step<F, ResourceCommonData, Req, Resp>(
    proxy: &Proxy,
    connector: BoxedConnectorIntegrationV2<'_, F, ResourceCommonData, Req, Resp>,
    router_data: RouterDataV2<F, ResourceCommonData, Req, Resp>,
    flow: FlowName,
) -> CustomResult<RouterDataV2<F, ResourceCommonData, Req, Resp>, ConnectorError>
where
    F: Clone + 'static,
    Req: Clone + std::fmt::Debug + 'static,
    Resp: Clone + std::fmt::Debug + 'static,
    ResourceCommonData: Clone + 'static,
{
    let connector_name = connector.id();
    let flow_label = flow.to_string();
    let span = tracing::info_span!(
        "outgoing_app_data",
        flow = %flow,
        connector = connector_name,
        method = Empty,
        url = Empty,
        request_headers = Empty,
        request_body = Empty,
        status_code = Empty,
        response_headers = Empty,
        response_body = Empty,
        latency_ms = Empty,
    );

    async {
        let Some(request) = connector.build_request_v2(&router_data)? else {
            return Ok(router_data);
        };

        let span = tracing::Span::current();
        span.record("method", tracing::field::display(request.method));
        span.record("url", request.url.as_str());
        span.record("request_headers", tracing::field::display(mask_headers(&request.headers)));
        span.record("request_body", tracing::field::display(mask_body(request.body.as_ref())));

        let labels = [flow_label.as_str(), connector_name];
        metrics::EXTERNAL_SERVICE_TOTAL_API_CALLS
            .with_label_values(&labels)
            .inc();

        let start = tokio::time::Instant::now();
        let response = call_connector_api(proxy, request).await;
        let elapsed = start.elapsed();
        metrics::EXTERNAL_SERVICE_API_CALLS_LATENCY
            .with_label_values(&labels)
            .observe(elapsed.as_secs_f64());
        span.record("latency_ms", elapsed.as_millis());

        let result = match response {
            Ok(Ok(body)) => {
                record_response(&body);
                connector.handle_response_v2(&router_data, body)
            }
            Ok(Err(body)) => {
                record_response(&body);
                let error = match body.status_code {
                    500..=599 => connector.get_5xx_error_response(body)?,
                    _ => connector.get_error_response_v2(body)?,
                };
                Ok(RouterDataV2 {
                    response: Err(error),
                    ..router_data
                })
            }
            Err(error) => {
                tracing::warn!(?error, "no usable answer from connector");
                metrics::EXTERNAL_SERVICE_API_CALLS_ERRORS
                    .with_label_values(&[
                        flow_label.as_str(),
                        connector_name,
                        error_label(error.current_context()),
                    ])
                    .inc();
                let context = match error.current_context() {
                    ApiClientError::BodySerializationFailed => ConnectorError::RequestEncodingFailed,
                    _ => ConnectorError::ProcessingStepFailed(None),
                };
                Err(error.change_context(context))
            }
        };

        tracing::info!("outgoing request completed");
        result
    }
    .instrument(span)
    .await
}

/// Bounded label for the error counter, free of per-request detail
fn error_label(error: &ApiClientError) -> &'static str {
    match error {
        ApiClientError::HeaderMapConstructionFailed => "header_map_construction_failed",
        ApiClientError::InvalidProxyConfiguration => "invalid_proxy_configuration",
        ApiClientError::ClientConstructionFailed => "client_construction_failed",
        ApiClientError::BodySerializationFailed => "body_serialization_failed",
        ApiClientError::UrlEncodingFailed => "url_encoding_failed",
        ApiClientError::RequestNotSent(_) => "request_not_sent",
        ApiClientError::ResponseDecodingFailed => "response_decoding_failed",
        ApiClientError::RequestTimeoutReceived => "request_timeout",
        ApiClientError::UnexpectedServerResponse => "unexpected_server_response",
    }
}

fn mask_headers(headers: &Headers) -> Value {
    let masked = headers
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Maskable::Masked(_) => MASKED_HEADER_VALUE.to_string(),
                Maskable::Normal(inner) => inner.to_owned(),
            };
            (key.clone(), Value::String(value))
        })
        .collect();
    Value::Object(masked)
}

fn mask_body(body: Option<&RequestContent>) -> Value {
    match body {
        Some(RequestContent::Json(inner) | RequestContent::FormUrlEncoded(inner)) => (**inner)
            .masked_serialize()
            .unwrap_or(json!({ "error": "failed to mask serialize connector request" })),
        None => Value::Null,
    }
}

fn record_response(body: &Response) {
    let span = tracing::Span::current();
    span.record("status_code", body.status_code);

    if let Some(headers) = body.headers.as_ref() {
        let header_map = headers
            .iter()
            .filter_map(|(name, value)| {
                let value = if value.is_sensitive() {
                    MASKED_HEADER_VALUE.to_string()
                } else {
                    value.to_str().ok()?.to_string()
                };
                Some((name.as_str().to_string(), Value::String(value)))
            })
            .collect();
        span.record(
            "response_headers",
            tracing::field::display(Value::Object(header_map)),
        );
    }

    if let Ok(response) = serde_json::from_slice::<Value>(&body.response) {
        span.record(
            "response_body",
            tracing::field::display(response.masked_serialize().unwrap_or(
                json!({ "error": "failed to mask serialize connector response" }),
            )),
        );
    }
}

/// Sends one request. `Ok(Err(_))` carries a 4xx or 5xx answer from the provider.
pub async fn call_connector_api(
    proxy: &Proxy,
    request: Request,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let url =
        reqwest::Url::parse(&request.url).change_context(ApiClientError::UrlEncodingFailed)?;

    let bypass_proxy = proxy.bypass_proxy_urls.contains(&url.to_string());
    let client = client(proxy, bypass_proxy)?;
    let headers = construct_header_map(request.headers)?;

    let builder = match request.method {
        Method::Get => client.get(url),
        Method::Post => client.post(url),
        Method::Put => client.put(url),
        Method::Patch => client.patch(url),
        Method::Delete => client.delete(url),
    }
    .headers(headers);

    let builder = match request.body {
        Some(RequestContent::Json(payload)) => builder.json(&payload),
        Some(payload @ RequestContent::FormUrlEncoded(_)) => builder.body(
            payload
                .get_inner_value()
                .change_context(ApiClientError::BodySerializationFailed)?
                .expose(),
        ),
        None => builder,
    };

    let response = builder.send().await.map_err(|error| {
        if error.is_timeout() {
            report!(ApiClientError::RequestTimeoutReceived)
        } else {
            report!(ApiClientError::RequestNotSent(error.to_string()))
        }
    })?;

    handle_response(response).await
}

static DIRECT_CLIENT: OnceCell<Client> = OnceCell::new();
static PROXIED_CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared client for the proxy setting in effect. Built once, then cloned.
fn client(proxy: &Proxy, bypass_proxy: bool) -> CustomResult<Client, ApiClientError> {
    let use_proxy = !bypass_proxy && (proxy.http_url.is_some() || proxy.https_url.is_some());
    let cell = if use_proxy {
        &PROXIED_CLIENT
    } else {
        &DIRECT_CLIENT
    };

    cell.get_or_try_init(|| {
        build_client(proxy, use_proxy)
            .inspect_err(|error| tracing::error!(?error, "failed to construct http client"))
    })
    .cloned()
}

fn build_client(proxy: &Proxy, use_proxy: bool) -> CustomResult<Client, ApiClientError> {
    let mut builder = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_idle_timeout(Duration::from_secs(
            proxy.idle_pool_connection_timeout.unwrap_or_default(),
        ));

    if use_proxy {
        if let Some(url) = proxy.https_url.as_ref() {
            builder = builder.proxy(
                reqwest::Proxy::https(url)
                    .change_context(ApiClientError::InvalidProxyConfiguration)
                    .attach_printable("https proxy url")?,
            );
        }
        if let Some(url) = proxy.http_url.as_ref() {
            builder = builder.proxy(
                reqwest::Proxy::http(url)
                    .change_context(ApiClientError::InvalidProxyConfiguration)
                    .attach_printable("http proxy url")?,
            );
        }
    }

    builder
        .build()
        .change_context(ApiClientError::ClientConstructionFailed)
}

async fn handle_response(
    resp: reqwest::Response,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let status_code = resp.status().as_u16();
    if !(200..=299).contains(&status_code) && !(400..=599).contains(&status_code) {
        tracing::warn!(status_code, "unexpected status from connector");
        return Err(report!(ApiClientError::UnexpectedServerResponse));
    }

    let headers = Some(resp.headers().to_owned());
    let response = resp
        .bytes()
        .await
        .change_context(ApiClientError::ResponseDecodingFailed)?;
    let response = Response {
        headers,
        response,
        status_code,
    };

    Ok(if status_code < 300 {
        Ok(response)
    } else {
        Err(response)
    })
}

fn construct_header_map(
    headers: Headers,
) -> CustomResult<reqwest::header::HeaderMap, ApiClientError> {
    use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

    headers
        .into_iter()
        .try_fold(HeaderMap::new(), |mut header_map, (name, value)| {
            let name = HeaderName::from_str(&name)
                .change_context(ApiClientError::HeaderMapConstructionFailed)?;
            let value = HeaderValue::from_str(&value.into_inner())
                .change_context(ApiClientError::HeaderMapConstructionFailed)?;
            header_map.append(name, value);
            Ok(header_map)
        })
}
