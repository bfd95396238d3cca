use std::collections::{BTreeMap, HashMap};

use common_enums::TransactionKind;
use common_utils::{pii::Email, request::Method, types::MinorUnit};
use gateway_api_types::webhooks::WebhookEvent;
use hyperswitch_masking::Secret;

use crate::types::Connectors;

#[derive(Debug, Clone)]
pub struct PaymentFlowData {
    pub kind: TransactionKind,
    pub connectors: Connectors,
}

#[derive(Debug, Clone)]
pub struct RefundFlowData {
    pub connectors: Connectors,
}

#[derive(Debug, Clone)]
pub struct CustomerFlowData {
    pub connectors: Connectors,
}

#[derive(Debug, Clone)]
pub struct EventFlowData {
    pub connectors: Connectors,
}

/// Charge creation, shared by the authorize and sale flows
#[derive(Debug, Clone, Default)]
pub struct PaymentsAuthorizeData {
    pub amount: Option<MinorUnit>,
    /// Lower-cased ISO currency code
    pub currency: String,
    pub token: Option<Secret<String>>,
    pub customer: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone)]
pub struct PaymentsCaptureData {
    pub connector_transaction_id: String,
    pub amount_to_capture: Option<MinorUnit>,
}

#[derive(Debug, Clone)]
pub struct PaymentVoidData {
    pub connector_transaction_id: String,
    pub amount: Option<MinorUnit>,
}

#[derive(Debug, Clone)]
pub struct RefundsData {
    pub connector_transaction_id: String,
    pub refund_amount: Option<MinorUnit>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentsResponseData {
    pub connector_transaction_id: String,
    pub amount: Option<MinorUnit>,
    pub payment_method: Option<PaymentMethodDetails>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefundsResponseData {
    pub connector_refund_id: String,
    pub connector_transaction_id: Option<String>,
    pub refund_amount: Option<MinorUnit>,
    pub refund_status: Option<String>,
}

/// Instrument a charge or saved source was made with, as reported by the connector
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentMethodDetails {
    pub object: Option<String>,
    pub funding: Option<String>,
    pub brand: Option<String>,
    pub last4: Option<String>,
    pub exp_month: Option<u8>,
    pub exp_year: Option<u16>,
    pub cvc_check: Option<String>,
}

impl PaymentMethodDetails {
    pub fn is_card(&self) -> bool {
        self.object.as_deref() == Some("card")
    }
}

#[derive(Debug, Clone, Default)]
pub struct CustomerCreateData {
    pub email: Option<Email>,
    pub description: Option<String>,
    pub metadata: Option<BTreeMap<String, String>>,
    pub source: Option<Secret<String>>,
}

#[derive(Debug, Clone)]
pub struct CustomerUpdateData {
    pub connector_customer_id: String,
    pub email: Option<Email>,
    pub description: Option<String>,
    pub metadata: Option<BTreeMap<String, String>>,
    pub source: Option<Secret<String>>,
}

#[derive(Debug, Clone)]
pub struct CustomerLookupData {
    pub connector_customer_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerResponseData {
    pub connector_customer_id: String,
    /// The connector's customer object as returned
    pub raw_response: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct SourceCreateData {
    pub connector_customer_id: String,
    pub token: Secret<String>,
}

#[derive(Debug, Clone)]
pub struct SourceUpdateData {
    pub connector_customer_id: String,
    pub connector_source_id: String,
    pub exp_month: Option<u8>,
    pub exp_year: Option<u16>,
    pub name: Option<String>,
}

/// Addresses one saved source, used by find and remove
#[derive(Debug, Clone)]
pub struct SourceLookupData {
    pub connector_customer_id: String,
    pub connector_source_id: String,
}

#[derive(Debug, Clone)]
pub struct SourceListData {
    pub connector_customer_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceResponseData {
    pub connector_source_id: String,
    pub connector_customer_id: Option<String>,
    pub payment_method: PaymentMethodDetails,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceRemoveResponseData {
    pub connector_source_id: String,
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceListResponseData {
    pub sources: Vec<SourceResponseData>,
}

#[derive(Debug, Clone)]
pub struct EventRetrieveData {
    pub event_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventResponseData {
    pub event: WebhookEvent,
}

#[derive(Debug, Clone)]
pub struct RequestDetails {
    pub method: Method,
    pub uri: Option<String>,
    /// Header names are lower-cased
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    pub query_params: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConnectorWebhookSecrets {
    pub secret: Vec<u8>,
    /// Accepted age of a signed timestamp, in seconds
    pub tolerance_secs: Option<i64>,
}
