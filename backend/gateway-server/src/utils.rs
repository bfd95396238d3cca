use std::collections::HashMap;

use common_utils::consts;
use connector_integration::types::ConnectorEnum;
use domain_types::{errors::ApplicationErrorResponse, utils::ForeignTryFrom};
use http::{request::Request, HeaderMap};
use hyperswitch_masking::Secret;

/// Gateway selection and credentials carried by an incoming request
#[derive(Debug, Clone)]
pub struct GatewayContext {
    pub connector: ConnectorEnum,
    /// Per-request secret key, overriding the configured one
    pub api_key: Option<Secret<String>>,
}

impl GatewayContext {
    /// Reads `x-gateway` (defaulting to Stripe) and `x-api-key`
    pub fn from_headers(
        headers: &HeaderMap,
    ) -> Result<Self, error_stack::Report<ApplicationErrorResponse>> {
        let connector = match header_value(headers, consts::X_GATEWAY) {
            Some(gateway) => ConnectorEnum::foreign_try_from(gateway)?,
            None => ConnectorEnum::Stripe,
        };
        let api_key = header_value(headers, consts::X_API_KEY)
            .filter(|key| !key.is_empty())
            .map(|key| Secret::new(key.to_owned()));

        Ok(Self { connector, api_key })
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Header map with lower-cased names, as connectors expect them. Values that are not
/// visible ASCII are dropped.
pub fn headers_to_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_ascii_lowercase(), value.to_owned()))
        })
        .collect()
}

/// Record the header's fields in request's trace
pub fn record_fields_from_header<B>(request: &Request<B>) -> tracing::Span {
    let url_path = request.uri().path();

    let span = tracing::debug_span!(
        "request",
        uri = %url_path,
        method = %request.method(),
        version = ?request.version(),
        tenant_id = tracing::field::Empty,
        request_id = tracing::field::Empty,
        gateway = tracing::field::Empty,
    );
    request
        .headers()
        .get(consts::X_TENANT_ID)
        .and_then(|value| value.to_str().ok())
        .map(|tenant_id| span.record("tenant_id", tenant_id));

    request
        .headers()
        .get(consts::X_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .map(|request_id| span.record("request_id", request_id));

    request
        .headers()
        .get(consts::X_GATEWAY)
        .and_then(|value| value.to_str().ok())
        .map(|gateway| span.record("gateway", gateway));

    span
}
