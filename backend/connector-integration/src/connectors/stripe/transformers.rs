use std::collections::BTreeMap;

use common_enums::ErrorCode;
use common_utils::{consts, date_time, pii::Email, types::MinorUnit};
use domain_types::{
    connector_flow::{
        Authorize, Capture, CreateCustomer, CreateSource, ListSources, Refund, RemoveSource,
        RetrieveEvent, Sale, UpdateCustomer, UpdateSource, Void,
    },
    connector_types::{
        CustomerCreateData, CustomerFlowData, CustomerResponseData,
        CustomerUpdateData, EventFlowData, EventResponseData, EventRetrieveData, PaymentFlowData,
        PaymentMethodDetails, PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData,
        PaymentsResponseData, RefundFlowData, RefundsData, RefundsResponseData, SourceCreateData,
        SourceListData, SourceListResponseData, SourceLookupData, SourceRemoveResponseData,
        SourceResponseData, SourceUpdateData,
    },
    errors::{self, WebhookError},
    router_data::{ConnectorAuthType, ErrorResponse},
    router_data_v2::RouterDataV2,
};
use error_stack::{report, ResultExt};
use gateway_api_types::webhooks::WebhookEvent;
use hyperswitch_masking::Secret;
use serde::{Deserialize, Serialize};

use super::StripeRouterData;
use crate::types::ResponseRouterData;

/// Event types the adapter hands on for processing. Everything else is flagged as ignored.
pub const PROCESSABLE_EVENT_TYPES: &[&str] = &[
    "charge.captured",
    "charge.failed",
    "charge.succeeded",
    "charge.refunded",
    "charge.updated",
    "customer.created",
    "customer.updated",
    "customer.deleted",
    "customer.card.created",
    "customer.card.updated",
    "customer.card.deleted",
    "customer.source.created",
    "customer.source.updated",
    "customer.source.deleted",
];

pub const LAST_STRIPE_EVENT_KEY: &str = "last_stripe_event";

pub struct StripeAuthType {
    pub api_key: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for StripeAuthType {
    type Error = error_stack::Report<errors::ConnectorError>;
    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::HeaderKey { api_key } => Ok(Self {
                api_key: api_key.to_owned(),
            }),
            ConnectorAuthType::NoKey => Err(report!(errors::ConnectorError::FailedToObtainAuthType)),
        }
    }
}

// Charges

#[derive(Debug, Serialize)]
pub struct StripeChargeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<MinorUnit>,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    pub capture: bool,
}

pub type StripeAuthorizeRequest = StripeChargeRequest;
pub type StripeSaleRequest = StripeChargeRequest;

impl StripeChargeRequest {
    fn from_request(request: &PaymentsAuthorizeData, capture: bool) -> Self {
        Self {
            amount: request.amount,
            currency: request.currency.clone(),
            source: request.token.clone(),
            customer: request.customer.clone(),
            description: request.description.clone(),
            metadata: request.metadata.clone(),
            capture,
        }
    }
}

impl
    TryFrom<
        StripeRouterData<
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        >,
    > for StripeChargeRequest
{
    type Error = error_stack::Report<errors::ConnectorError>;
    fn try_from(
        item: StripeRouterData<
            RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(Self::from_request(&item.router_data.request, false))
    }
}

impl
    TryFrom<
        StripeRouterData<
            RouterDataV2<Sale, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        >,
    > for StripeChargeRequest
{
    type Error = error_stack::Report<errors::ConnectorError>;
    fn try_from(
        item: StripeRouterData<
            RouterDataV2<Sale, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(Self::from_request(&item.router_data.request, true))
    }
}

#[derive(Debug, Serialize)]
pub struct StripeCaptureRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<MinorUnit>,
}

impl
    TryFrom<
        StripeRouterData<
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>,
        >,
    > for StripeCaptureRequest
{
    type Error = error_stack::Report<errors::ConnectorError>;
    fn try_from(
        item: StripeRouterData<
            RouterDataV2<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: item.router_data.request.amount_to_capture,
        })
    }
}

/// Card as Stripe reports it, either attached to a customer or as a charge source
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCard {
    pub id: String,
    pub object: Option<String>,
    pub customer: Option<String>,
    pub funding: Option<String>,
    pub brand: Option<String>,
    pub last4: Option<String>,
    pub exp_month: Option<u8>,
    pub exp_year: Option<u16>,
    pub cvc_check: Option<String>,
}

impl From<&StripeCard> for PaymentMethodDetails {
    fn from(card: &StripeCard) -> Self {
        Self {
            object: card.object.clone(),
            funding: card.funding.clone(),
            brand: card.brand.clone(),
            last4: card.last4.clone(),
            exp_month: card.exp_month,
            exp_year: card.exp_year,
            cvc_check: card.cvc_check.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripePaymentMethodDetails {
    pub card: Option<StripeChargeCard>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeChargeCard {
    pub brand: Option<String>,
    pub funding: Option<String>,
    pub last4: Option<String>,
    pub exp_month: Option<u8>,
    pub exp_year: Option<u16>,
    pub checks: Option<StripeCardChecks>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeCardChecks {
    pub cvc_check: Option<String>,
}

impl From<&StripeChargeCard> for PaymentMethodDetails {
    fn from(card: &StripeChargeCard) -> Self {
        Self {
            object: Some("card".to_string()),
            funding: card.funding.clone(),
            brand: card.brand.clone(),
            last4: card.last4.clone(),
            exp_month: card.exp_month,
            exp_year: card.exp_year,
            cvc_check: card.checks.as_ref().and_then(|checks| checks.cvc_check.clone()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeChargeResponse {
    pub id: String,
    pub amount: Option<MinorUnit>,
    pub status: Option<String>,
    pub source: Option<StripeCard>,
    pub payment_method_details: Option<StripePaymentMethodDetails>,
}

pub type StripeAuthorizeResponse = StripeChargeResponse;
pub type StripeSaleResponse = StripeChargeResponse;
pub type StripeCaptureResponse = StripeChargeResponse;

impl From<StripeChargeResponse> for PaymentsResponseData {
    fn from(charge: StripeChargeResponse) -> Self {
        let payment_method = charge.source.as_ref().map(PaymentMethodDetails::from).or_else(|| {
            charge
                .payment_method_details
                .as_ref()
                .and_then(|details| details.card.as_ref())
                .map(PaymentMethodDetails::from)
        });
        Self {
            connector_transaction_id: charge.id,
            amount: charge.amount,
            payment_method,
        }
    }
}

impl<F, Req> TryFrom<ResponseRouterData<StripeChargeResponse, Self>>
    for RouterDataV2<F, PaymentFlowData, Req, PaymentsResponseData>
{
    type Error = error_stack::Report<errors::ConnectorError>;

    fn try_from(
        value: ResponseRouterData<StripeChargeResponse, Self>,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            router_data,
            http_code: _,
        } = value;
        Ok(Self {
            response: Ok(PaymentsResponseData::from(response)),
            ..router_data
        })
    }
}

// Refunds, also used to void an uncaptured charge

#[derive(Debug, Serialize)]
pub struct StripeRefundRequest {
    pub charge: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<MinorUnit>,
}

pub type StripeVoidRequest = StripeRefundRequest;

impl
    TryFrom<
        StripeRouterData<
            RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
        >,
    > for StripeRefundRequest
{
    type Error = error_stack::Report<errors::ConnectorError>;
    fn try_from(
        item: StripeRouterData<
            RouterDataV2<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        let request = item.router_data.request;
        Ok(Self {
            charge: request.connector_transaction_id,
            amount: request.amount,
        })
    }
}

impl TryFrom<StripeRouterData<RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>>>
    for StripeRefundRequest
{
    type Error = error_stack::Report<errors::ConnectorError>;
    fn try_from(
        item: StripeRouterData<RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData>>,
    ) -> Result<Self, Self::Error> {
        let request = item.router_data.request;
        Ok(Self {
            charge: request.connector_transaction_id,
            amount: request.refund_amount,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeRefundResponse {
    pub id: String,
    pub amount: Option<MinorUnit>,
    pub charge: Option<String>,
    pub status: Option<String>,
}

pub type StripeVoidResponse = StripeRefundResponse;

impl<F> TryFrom<ResponseRouterData<StripeRefundResponse, Self>>
    for RouterDataV2<F, PaymentFlowData, PaymentVoidData, PaymentsResponseData>
{
    type Error = error_stack::Report<errors::ConnectorError>;

    fn try_from(
        value: ResponseRouterData<StripeRefundResponse, Self>,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            router_data,
            http_code: _,
        } = value;
        let connector_transaction_id = response
            .charge
            .unwrap_or_else(|| router_data.request.connector_transaction_id.clone());
        Ok(Self {
            response: Ok(PaymentsResponseData {
                connector_transaction_id,
                amount: response.amount,
                payment_method: None,
            }),
            ..router_data
        })
    }
}

impl<F> TryFrom<ResponseRouterData<StripeRefundResponse, Self>>
    for RouterDataV2<F, RefundFlowData, RefundsData, RefundsResponseData>
{
    type Error = error_stack::Report<errors::ConnectorError>;

    fn try_from(
        value: ResponseRouterData<StripeRefundResponse, Self>,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            router_data,
            http_code: _,
        } = value;
        Ok(Self {
            response: Ok(RefundsResponseData {
                connector_refund_id: response.id,
                connector_transaction_id: response.charge,
                refund_amount: response.amount,
                refund_status: response.status,
            }),
            ..router_data
        })
    }
}

// Customers

#[derive(Debug, Serialize)]
pub struct StripeCustomerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Secret<String>>,
}

pub type StripeCreateCustomerRequest = StripeCustomerRequest;
pub type StripeUpdateCustomerRequest = StripeCustomerRequest;

impl
    TryFrom<
        StripeRouterData<
            RouterDataV2<CreateCustomer, CustomerFlowData, CustomerCreateData, CustomerResponseData>,
        >,
    > for StripeCustomerRequest
{
    type Error = error_stack::Report<errors::ConnectorError>;
    fn try_from(
        item: StripeRouterData<
            RouterDataV2<CreateCustomer, CustomerFlowData, CustomerCreateData, CustomerResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        let request = item.router_data.request;
        Ok(Self {
            email: request.email,
            description: request.description,
            metadata: request.metadata,
            source: request.source,
        })
    }
}

impl
    TryFrom<
        StripeRouterData<
            RouterDataV2<UpdateCustomer, CustomerFlowData, CustomerUpdateData, CustomerResponseData>,
        >,
    > for StripeCustomerRequest
{
    type Error = error_stack::Report<errors::ConnectorError>;
    fn try_from(
        item: StripeRouterData<
            RouterDataV2<UpdateCustomer, CustomerFlowData, CustomerUpdateData, CustomerResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        let request = item.router_data.request;
        Ok(Self {
            email: request.email,
            description: request.description,
            metadata: request.metadata,
            source: request.source,
        })
    }
}

/// Stripe customer object, kept whole so it can be handed back as the customer's data
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct StripeCustomerResponse(pub serde_json::Value);

pub type StripeCreateCustomerResponse = StripeCustomerResponse;
pub type StripeUpdateCustomerResponse = StripeCustomerResponse;
pub type StripeFindCustomerResponse = StripeCustomerResponse;

impl<F, Req> TryFrom<ResponseRouterData<StripeCustomerResponse, Self>>
    for RouterDataV2<F, CustomerFlowData, Req, CustomerResponseData>
{
    type Error = error_stack::Report<errors::ConnectorError>;

    fn try_from(
        value: ResponseRouterData<StripeCustomerResponse, Self>,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response: StripeCustomerResponse(raw_response),
            router_data,
            http_code: _,
        } = value;
        let connector_customer_id = raw_response
            .get("id")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
            .ok_or(errors::ConnectorError::ResponseHandlingFailed)
            .attach_printable("Stripe customer object has no id")?;
        Ok(Self {
            response: Ok(CustomerResponseData {
                connector_customer_id,
                raw_response,
            }),
            ..router_data
        })
    }
}

// Customer sources

#[derive(Debug, Serialize)]
pub struct StripeCreateSourceRequest {
    pub source: Secret<String>,
}

impl
    TryFrom<
        StripeRouterData<
            RouterDataV2<CreateSource, CustomerFlowData, SourceCreateData, SourceResponseData>,
        >,
    > for StripeCreateSourceRequest
{
    type Error = error_stack::Report<errors::ConnectorError>;
    fn try_from(
        item: StripeRouterData<
            RouterDataV2<CreateSource, CustomerFlowData, SourceCreateData, SourceResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            source: item.router_data.request.token,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StripeUpdateSourceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp_month: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp_year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl
    TryFrom<
        StripeRouterData<
            RouterDataV2<UpdateSource, CustomerFlowData, SourceUpdateData, SourceResponseData>,
        >,
    > for StripeUpdateSourceRequest
{
    type Error = error_stack::Report<errors::ConnectorError>;
    fn try_from(
        item: StripeRouterData<
            RouterDataV2<UpdateSource, CustomerFlowData, SourceUpdateData, SourceResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        let request = item.router_data.request;
        Ok(Self {
            exp_month: request.exp_month,
            exp_year: request.exp_year,
            name: request.name,
        })
    }
}

pub type StripeCreateSourceResponse = StripeCard;
pub type StripeUpdateSourceResponse = StripeCard;
pub type StripeFindSourceResponse = StripeCard;

impl From<StripeCard> for SourceResponseData {
    fn from(card: StripeCard) -> Self {
        let payment_method = PaymentMethodDetails::from(&card);
        Self {
            connector_source_id: card.id,
            connector_customer_id: card.customer,
            payment_method,
        }
    }
}

impl<F, Req> TryFrom<ResponseRouterData<StripeCard, Self>>
    for RouterDataV2<F, CustomerFlowData, Req, SourceResponseData>
{
    type Error = error_stack::Report<errors::ConnectorError>;

    fn try_from(value: ResponseRouterData<StripeCard, Self>) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            router_data,
            http_code: _,
        } = value;
        Ok(Self {
            response: Ok(SourceResponseData::from(response)),
            ..router_data
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeRemoveSourceResponse {
    pub id: String,
    #[serde(default)]
    pub deleted: bool,
}

impl TryFrom<ResponseRouterData<StripeRemoveSourceResponse, Self>>
    for RouterDataV2<RemoveSource, CustomerFlowData, SourceLookupData, SourceRemoveResponseData>
{
    type Error = error_stack::Report<errors::ConnectorError>;

    fn try_from(
        value: ResponseRouterData<StripeRemoveSourceResponse, Self>,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            router_data,
            http_code: _,
        } = value;
        Ok(Self {
            response: Ok(SourceRemoveResponseData {
                connector_source_id: response.id,
                deleted: response.deleted,
            }),
            ..router_data
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeListSourcesResponse {
    #[serde(default)]
    pub data: Vec<StripeCard>,
}

impl TryFrom<ResponseRouterData<StripeListSourcesResponse, Self>>
    for RouterDataV2<ListSources, CustomerFlowData, SourceListData, SourceListResponseData>
{
    type Error = error_stack::Report<errors::ConnectorError>;

    fn try_from(
        value: ResponseRouterData<StripeListSourcesResponse, Self>,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            router_data,
            http_code: _,
        } = value;
        Ok(Self {
            response: Ok(SourceListResponseData {
                sources: response
                    .data
                    .into_iter()
                    .map(SourceResponseData::from)
                    .collect(),
            }),
            ..router_data
        })
    }
}

// Events

pub type StripeRetrieveEventResponse = WebhookEvent;

impl TryFrom<ResponseRouterData<WebhookEvent, Self>>
    for RouterDataV2<RetrieveEvent, EventFlowData, EventRetrieveData, EventResponseData>
{
    type Error = error_stack::Report<errors::ConnectorError>;

    fn try_from(value: ResponseRouterData<WebhookEvent, Self>) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            router_data,
            http_code: _,
        } = value;
        Ok(Self {
            response: Ok(EventResponseData { event: response }),
            ..router_data
        })
    }
}

/// Checks the envelope shape and annotates it with the event time and whether it is processable
pub fn normalize_webhook_event(
    mut event: WebhookEvent,
) -> Result<WebhookEvent, error_stack::Report<WebhookError>> {
    if !event.data.as_ref().is_some_and(serde_json::Value::is_object) {
        return Err(report!(WebhookError::DataNotAnObject));
    }

    // an unusable `created` leaves the event time empty rather than rejecting the delivery
    let last_stripe_event = event.created.and_then(|created| {
        date_time::from_unix_timestamp(created)
            .and_then(date_time::format_rfc3339)
            .inspect_err(|error| tracing::warn!(created, ?error, "event time out of range"))
            .ok()
    });

    let object = event
        .data_object_mut()
        .ok_or(report!(WebhookError::DataObjectNotAnObject))?;
    object.insert(
        LAST_STRIPE_EVENT_KEY.to_string(),
        last_stripe_event.map_or(serde_json::Value::Null, serde_json::Value::String),
    );

    let processable = event
        .event_type
        .as_deref()
        .is_some_and(|event_type| PROCESSABLE_EVENT_TYPES.contains(&event_type));
    if !processable {
        event.ignored = Some(true);
    }

    Ok(event)
}

// Errors

#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorBody {
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<String>,
    pub decline_code: Option<String>,
    pub message: Option<String>,
    pub param: Option<String>,
}

/// Resolves a Stripe error (and decline) code to the generic error code
pub fn map_error_code(code: Option<&str>, decline_code: Option<&str>) -> ErrorCode {
    match (code, decline_code) {
        (Some("incorrect_number"), _) => ErrorCode::IncorrectNumber,
        (Some("invalid_number"), _) => ErrorCode::InvalidNumber,
        (Some("invalid_expiry_month" | "invalid_expiry_year"), _) => ErrorCode::InvalidExpiryDate,
        (Some("invalid_cvc"), _) => ErrorCode::InvalidCvc,
        (Some("expired_card"), _) => ErrorCode::ExpiredCard,
        (Some("incorrect_cvc"), _) => ErrorCode::IncorrectCvc,
        (Some("incorrect_zip"), _) => ErrorCode::IncorrectZip,
        (Some("card_declined"), Some("call_issuer")) => ErrorCode::CallIssuer,
        (Some("card_declined"), Some("pickup_card")) => ErrorCode::PickUpCard,
        (Some("card_declined"), _) => ErrorCode::CardDeclined,
        _ => ErrorCode::ProcessingError,
    }
}

impl StripeErrorResponse {
    pub fn into_error_response(self, status_code: u16, raw: Option<String>) -> ErrorResponse {
        let StripeErrorBody {
            error_type,
            code,
            decline_code,
            message,
            param,
        } = self.error;
        let error_code = map_error_code(code.as_deref(), decline_code.as_deref());
        ErrorResponse {
            code: code
                .or(error_type)
                .unwrap_or_else(|| consts::NO_ERROR_CODE.to_string()),
            message: message.unwrap_or_else(|| consts::NO_ERROR_MESSAGE.to_string()),
            reason: param,
            status_code,
            error_code,
            network_decline_code: decline_code,
            raw_connector_response: raw,
        }
    }
}
