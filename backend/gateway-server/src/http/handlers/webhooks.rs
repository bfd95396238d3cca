use axum::{
    extract::{Path, State},
    http::{HeaderMap, Uri},
    Json,
};
use bytes::Bytes;
use common_utils::request::Method;
use connector_integration::types::ConnectorEnum;
use domain_types::{connector_types::RequestDetails, utils::ForeignTryFrom};
use gateway_api_types::webhooks::WebhookEvent;

use crate::{
    http::{error::HttpError, state::AppState, utils::ValidatedJson},
    utils::{headers_to_map, GatewayContext},
};

/// Event id to look up at the gateway
#[derive(Debug, serde::Deserialize)]
pub struct ValidateEventRequest {
    pub id: String,
}

/// Takes the raw body since signatures cover the exact bytes delivered
pub async fn webhook(
    State(state): State<AppState>,
    Path(gateway): Path<String>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookEvent>, HttpError> {
    let mut context = GatewayContext::from_headers(&headers)?;
    context.connector = ConnectorEnum::foreign_try_from(gateway.as_str())?;

    let request = RequestDetails {
        method: Method::Post,
        uri: Some(uri.path().to_owned()),
        headers: headers_to_map(&headers),
        body: body.to_vec(),
        query_params: uri.query().map(str::to_owned),
    };

    Ok(Json(state.webhooks_service.webhook(&context, request)?))
}

pub async fn validate_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(payload): ValidatedJson<ValidateEventRequest>,
) -> Result<Json<WebhookEvent>, HttpError> {
    let context = GatewayContext::from_headers(&headers)?;
    let event = state
        .webhooks_service
        .validate_event(&context, payload.id)
        .await?;
    Ok(Json(event))
}
