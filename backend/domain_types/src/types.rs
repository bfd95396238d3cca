use common_enums::{ErrorCode, TransactionKind};
use common_utils::{
    consts::{AUTHORIZATION_VALIDITY_DAYS, DEFAULT_CURRENCY},
    date_time,
    ext_traits::OptionExt,
};
use error_stack::{report, ResultExt};
use gateway_api_types::{
    customers::{Customer, Source},
    payments::{PaymentDetails, Transaction},
    webhooks::WebhookEvent,
};
use hyperswitch_masking::Secret;

use crate::{
    connector_flow::{Authorize, RemoveSource, Sale},
    connector_types::{
        CustomerCreateData, CustomerFlowData, CustomerLookupData, CustomerResponseData,
        CustomerUpdateData, EventFlowData, EventResponseData, EventRetrieveData, PaymentFlowData,
        PaymentMethodDetails, PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData,
        PaymentsResponseData, RefundFlowData, RefundsData, RefundsResponseData, SourceCreateData,
        SourceListData, SourceListResponseData, SourceLookupData, SourceRemoveResponseData,
        SourceResponseData, SourceUpdateData,
    },
    errors::{ApiError, ApplicationErrorResponse},
    router_data::ErrorResponse,
    router_data_v2::RouterDataV2,
    utils::{stringify_metadata, ForeignFrom, ForeignTryFrom},
};

/// Address verification is not performed, every card charge reports a match
const AVS_RESULT_CODE: &str = "Y";

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Connectors {
    pub stripe: ConnectorParams,
}

#[derive(Clone, serde::Deserialize, Debug)]
pub struct ConnectorParams {
    /// base url
    pub base_url: String,
}

#[derive(Debug, serde::Deserialize, Clone, Default)]
pub struct Proxy {
    pub http_url: Option<String>,
    pub https_url: Option<String>,
    pub idle_pool_connection_timeout: Option<u64>,
    #[serde(default)]
    pub bypass_proxy_urls: Vec<String>,
}

fn missing_required_field(field_name: &'static str) -> ApplicationErrorResponse {
    ApplicationErrorResponse::BadRequest(ApiError {
        sub_code: "MISSING_REQUIRED_FIELD".to_owned(),
        error_identifier: 400,
        error_message: format!("Missing required field: {field_name}"),
        error_object: None,
    })
}

fn required<T>(
    value: Option<T>,
    field_name: &'static str,
) -> Result<T, error_stack::Report<ApplicationErrorResponse>> {
    value
        .get_required_value(field_name)
        .change_context(missing_required_field(field_name))
}

fn payment_token(details: Option<&PaymentDetails>) -> Option<Secret<String>> {
    details.and_then(|details| details.token.clone())
}

impl ForeignFrom<&Transaction> for PaymentsAuthorizeData {
    fn foreign_from(transaction: &Transaction) -> Self {
        Self {
            amount: transaction.amount,
            currency: transaction
                .currency
                .as_deref()
                .unwrap_or(DEFAULT_CURRENCY)
                .to_lowercase(),
            token: payment_token(transaction.payment_details.as_ref()),
            customer: transaction
                .payment_details
                .as_ref()
                .and_then(|details| details.customer.clone()),
            description: transaction.description.clone(),
            metadata: stringify_metadata(transaction.metadata.as_ref()),
        }
    }
}

impl ForeignTryFrom<&Transaction> for PaymentsCaptureData {
    type Error = ApplicationErrorResponse;

    fn foreign_try_from(
        transaction: &Transaction,
    ) -> Result<Self, error_stack::Report<Self::Error>> {
        Ok(Self {
            connector_transaction_id: required(
                transaction.authorization.clone(),
                "authorization",
            )?,
            amount_to_capture: transaction.amount,
        })
    }
}

impl ForeignTryFrom<&Transaction> for PaymentVoidData {
    type Error = ApplicationErrorResponse;

    fn foreign_try_from(
        transaction: &Transaction,
    ) -> Result<Self, error_stack::Report<Self::Error>> {
        Ok(Self {
            connector_transaction_id: required(
                transaction.authorization.clone(),
                "authorization",
            )?,
            amount: transaction.amount.filter(|amount| amount.is_greater_than(0)),
        })
    }
}

impl ForeignTryFrom<&Transaction> for RefundsData {
    type Error = ApplicationErrorResponse;

    fn foreign_try_from(
        transaction: &Transaction,
    ) -> Result<Self, error_stack::Report<Self::Error>> {
        Ok(Self {
            connector_transaction_id: required(
                transaction.authorization.clone(),
                "authorization",
            )?,
            refund_amount: transaction.amount.filter(|amount| amount.is_greater_than(0)),
        })
    }
}

/// Copies what the connector revealed about the instrument onto the generic payment details
pub fn fill_payment_details(details: &mut PaymentDetails, method: &PaymentMethodDetails) {
    details.payment_type = match (&method.funding, &method.object) {
        (Some(funding), Some(object)) => Some(format!("{funding}_{object}")),
        (None, Some(object)) => Some(object.clone()),
        (Some(funding), None) => Some(funding.clone()),
        (None, None) => details.payment_type.take(),
    };
    if method.is_card() {
        details.avs_result_code = Some(AVS_RESULT_CODE.to_string());
        details.credit_card_iin = None;
        details.credit_card_company = method.brand.clone();
        details.credit_card_number = method
            .last4
            .as_ref()
            .map(|last4| format!("**** **** **** {last4}"));
        details.credit_card_exp_month = method.exp_month;
        details.credit_card_exp_year = method.exp_year;
        details.cvv_result_code = method.cvc_check.clone();
    }
}

/// Marks the transaction failed after the connector could not be reached or understood
pub fn generate_transaction_failure(
    mut transaction: Transaction,
    kind: TransactionKind,
    reason: String,
) -> Transaction {
    transaction.begin(kind);
    transaction.fail(ErrorCode::ProcessingError, Some(reason));
    transaction
}

fn apply_charge_response(
    mut transaction: Transaction,
    kind: TransactionKind,
    response: Result<PaymentsResponseData, ErrorResponse>,
) -> Transaction {
    let details = transaction.begin(kind);
    match response {
        Ok(response) => {
            if let Some(method) = response.payment_method.as_ref() {
                fill_payment_details(details, method);
            }
            if response.amount.is_some() {
                transaction.amount = response.amount;
            }
            transaction.authorization = Some(response.connector_transaction_id);
            transaction.succeed();
        }
        Err(error) => transaction.fail(error.error_code, Some(error.message)),
    }
    transaction
}

pub fn generate_payment_authorize_response(
    transaction: Transaction,
    router_data_v2: RouterDataV2<
        Authorize,
        PaymentFlowData,
        PaymentsAuthorizeData,
        PaymentsResponseData,
    >,
) -> Transaction {
    let approved = router_data_v2.response.is_ok();
    let mut transaction = apply_charge_response(
        transaction,
        TransactionKind::Authorize,
        router_data_v2.response,
    );
    if approved {
        transaction.authorization_exp = Some(date_time::days_from_now(AUTHORIZATION_VALIDITY_DAYS));
    }
    transaction
}

pub fn generate_payment_sale_response(
    transaction: Transaction,
    router_data_v2: RouterDataV2<Sale, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
) -> Transaction {
    apply_charge_response(transaction, TransactionKind::Sale, router_data_v2.response)
}

pub fn generate_payment_capture_response<F>(
    transaction: Transaction,
    router_data_v2: RouterDataV2<F, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>,
) -> Transaction {
    apply_charge_response(transaction, TransactionKind::Capture, router_data_v2.response)
}

pub fn generate_payment_void_response<F>(
    mut transaction: Transaction,
    router_data_v2: RouterDataV2<F, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
) -> Transaction {
    transaction.begin(TransactionKind::Void);
    match router_data_v2.response {
        Ok(response) => {
            transaction.amount = response.amount;
            transaction.succeed();
        }
        Err(error) => transaction.fail(error.error_code, Some(error.message)),
    }
    transaction
}

pub fn generate_refund_response<F>(
    mut transaction: Transaction,
    router_data_v2: RouterDataV2<F, RefundFlowData, RefundsData, RefundsResponseData>,
) -> Transaction {
    transaction.begin(TransactionKind::Refund);
    match router_data_v2.response {
        Ok(response) => {
            transaction.amount = response.refund_amount;
            transaction.succeed();
        }
        Err(error) => transaction.fail(error.error_code, Some(error.message)),
    }
    transaction
}

impl ForeignFrom<ErrorResponse> for ApplicationErrorResponse {
    fn foreign_from(error: ErrorResponse) -> Self {
        let status_code = error.status_code;
        let api_error = ApiError {
            sub_code: error.error_code.to_string(),
            error_identifier: status_code,
            error_message: error.message,
            error_object: error
                .raw_connector_response
                .as_deref()
                .and_then(|raw| serde_json::from_str(raw).ok()),
        };
        match status_code {
            401 => Self::Unauthorized(api_error),
            404 => Self::NotFound(api_error),
            500..=599 => Self::BadGateway(api_error),
            _ => Self::BadRequest(api_error),
        }
    }
}

impl ForeignFrom<&Customer> for CustomerCreateData {
    fn foreign_from(customer: &Customer) -> Self {
        Self {
            email: customer.email.clone(),
            description: customer.description.clone(),
            metadata: stringify_metadata(customer.metadata.as_ref()),
            source: customer.token.clone(),
        }
    }
}

impl ForeignTryFrom<&Customer> for CustomerUpdateData {
    type Error = ApplicationErrorResponse;

    fn foreign_try_from(customer: &Customer) -> Result<Self, error_stack::Report<Self::Error>> {
        Ok(Self {
            connector_customer_id: required(customer.foreign_id.clone(), "foreign_id")?,
            email: customer.email.clone(),
            description: customer.description.clone(),
            metadata: stringify_metadata(customer.metadata.as_ref()),
            source: customer.token.clone(),
        })
    }
}

impl ForeignTryFrom<&Customer> for CustomerLookupData {
    type Error = ApplicationErrorResponse;

    fn foreign_try_from(customer: &Customer) -> Result<Self, error_stack::Report<Self::Error>> {
        Ok(Self {
            connector_customer_id: required(customer.foreign_id.clone(), "foreign_id")?,
        })
    }
}

impl ForeignTryFrom<&Customer> for SourceListData {
    type Error = ApplicationErrorResponse;

    fn foreign_try_from(customer: &Customer) -> Result<Self, error_stack::Report<Self::Error>> {
        Ok(Self {
            connector_customer_id: required(customer.foreign_id.clone(), "foreign_id")?,
        })
    }
}

impl ForeignTryFrom<&Source> for SourceCreateData {
    type Error = ApplicationErrorResponse;

    fn foreign_try_from(source: &Source) -> Result<Self, error_stack::Report<Self::Error>> {
        Ok(Self {
            connector_customer_id: required(
                source.account_foreign_id.clone(),
                "account_foreign_id",
            )?,
            token: required(source.token.clone(), "token")?,
        })
    }
}

impl ForeignTryFrom<&Source> for SourceUpdateData {
    type Error = ApplicationErrorResponse;

    fn foreign_try_from(source: &Source) -> Result<Self, error_stack::Report<Self::Error>> {
        Ok(Self {
            connector_customer_id: required(
                source.account_foreign_id.clone(),
                "account_foreign_id",
            )?,
            connector_source_id: required(source.foreign_id.clone(), "foreign_id")?,
            exp_month: source.exp_month,
            exp_year: source.exp_year,
            name: source.name.clone(),
        })
    }
}

impl ForeignTryFrom<&Source> for SourceLookupData {
    type Error = ApplicationErrorResponse;

    fn foreign_try_from(source: &Source) -> Result<Self, error_stack::Report<Self::Error>> {
        Ok(Self {
            connector_customer_id: required(
                source.account_foreign_id.clone(),
                "account_foreign_id",
            )?,
            connector_source_id: required(source.foreign_id.clone(), "foreign_id")?,
        })
    }
}

pub fn generate_customer_response<F, Req>(
    mut customer: Customer,
    router_data_v2: RouterDataV2<F, CustomerFlowData, Req, CustomerResponseData>,
) -> Result<Customer, error_stack::Report<ApplicationErrorResponse>> {
    let response = router_data_v2
        .response
        .map_err(|error| report!(ApplicationErrorResponse::foreign_from(error)))?;
    customer.link(response.connector_customer_id, response.raw_response);
    Ok(customer)
}

fn link_source(mut source: Source, response: SourceResponseData) -> Source {
    let mut details = source
        .payment_details
        .take()
        .unwrap_or_else(PaymentDetails::for_gateway);
    fill_payment_details(&mut details, &response.payment_method);
    let account_foreign_id = response
        .connector_customer_id
        .or_else(|| source.account_foreign_id.clone())
        .unwrap_or_default();
    source.link(account_foreign_id, response.connector_source_id, details);
    source
}

pub fn generate_source_response<F, Req>(
    source: Source,
    router_data_v2: RouterDataV2<F, CustomerFlowData, Req, SourceResponseData>,
) -> Result<Source, error_stack::Report<ApplicationErrorResponse>> {
    let response = router_data_v2
        .response
        .map_err(|error| report!(ApplicationErrorResponse::foreign_from(error)))?;
    Ok(link_source(source, response))
}

pub fn generate_source_remove_response(
    mut source: Source,
    router_data_v2: RouterDataV2<
        RemoveSource,
        CustomerFlowData,
        SourceLookupData,
        SourceRemoveResponseData,
    >,
) -> Result<Source, error_stack::Report<ApplicationErrorResponse>> {
    let response = router_data_v2
        .response
        .map_err(|error| report!(ApplicationErrorResponse::foreign_from(error)))?;
    if !response.deleted {
        return Err(report!(ApplicationErrorResponse::Unprocessable(ApiError {
            sub_code: "SOURCE_NOT_DELETED".to_owned(),
            error_identifier: 422,
            error_message: format!("Source {} was not deleted", response.connector_source_id),
            error_object: None,
        })));
    }
    source.foreign_id = Some(response.connector_source_id);
    Ok(source)
}

pub fn generate_source_list_response<F>(
    customer: &Customer,
    router_data_v2: RouterDataV2<F, CustomerFlowData, SourceListData, SourceListResponseData>,
) -> Result<Vec<Source>, error_stack::Report<ApplicationErrorResponse>> {
    let response = router_data_v2
        .response
        .map_err(|error| report!(ApplicationErrorResponse::foreign_from(error)))?;
    Ok(response
        .sources
        .into_iter()
        .map(|source| {
            let owner = Source {
                account_foreign_id: customer.foreign_id.clone(),
                ..Default::default()
            };
            link_source(owner, source)
        })
        .collect())
}

pub fn generate_event_response<F>(
    router_data_v2: RouterDataV2<F, EventFlowData, EventRetrieveData, EventResponseData>,
) -> Result<WebhookEvent, error_stack::Report<ApplicationErrorResponse>> {
    router_data_v2
        .response
        .map(|response| response.event)
        .map_err(|error| report!(ApplicationErrorResponse::foreign_from(error)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    use common_enums::TransactionStatus;
    use common_utils::types::MinorUnit;

    use super::*;
    use crate::router_data::ConnectorAuthType;

    fn connectors() -> Connectors {
        Connectors {
            stripe: ConnectorParams {
                base_url: "https://api.stripe.com/".to_string(),
            },
        }
    }

    fn visa() -> PaymentMethodDetails {
        PaymentMethodDetails {
            object: Some("card".to_string()),
            funding: Some("credit".to_string()),
            brand: Some("Visa".to_string()),
            last4: Some("4242".to_string()),
            exp_month: Some(8),
            exp_year: Some(2030),
            cvc_check: Some("pass".to_string()),
        }
    }

    fn authorize_router_data(
        response: Result<PaymentsResponseData, ErrorResponse>,
    ) -> RouterDataV2<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData> {
        let mut router_data = RouterDataV2::new(
            PaymentFlowData {
                kind: TransactionKind::Authorize,
                connectors: connectors(),
            },
            ConnectorAuthType::NoKey,
            PaymentsAuthorizeData::default(),
        );
        router_data.response = response;
        router_data
    }

    #[test]
    fn charge_data_defaults_currency_and_forwards_optional_fields() {
        let transaction = Transaction {
            amount: Some(MinorUnit::new(100)),
            currency: Some("EUR".to_string()),
            description: Some("order 42".to_string()),
            ..Default::default()
        };
        let data = PaymentsAuthorizeData::foreign_from(&transaction);
        assert_eq!(data.currency, "eur");
        assert_eq!(data.description.as_deref(), Some("order 42"));
        assert!(data.token.is_none());

        let data = PaymentsAuthorizeData::foreign_from(&Transaction::default());
        assert_eq!(data.currency, "usd");
        assert!(data.amount.is_none());
    }

    #[test]
    fn capture_without_authorization_is_rejected() {
        let error = PaymentsCaptureData::foreign_try_from(&Transaction::default())
            .expect_err("authorization is required");
        assert_eq!(error.current_context().api_error().sub_code, "MISSING_REQUIRED_FIELD");
        assert!(RefundsData::foreign_try_from(&Transaction::default()).is_err());
        assert!(PaymentVoidData::foreign_try_from(&Transaction::default()).is_err());
    }

    #[test]
    fn refund_amount_is_only_forwarded_when_positive() {
        let transaction = Transaction {
            authorization: Some("ch_1".to_string()),
            amount: Some(MinorUnit::zero()),
            ..Default::default()
        };
        let data = RefundsData::foreign_try_from(&transaction).expect("valid refund");
        assert!(data.refund_amount.is_none());
    }

    #[test]
    fn approved_authorization_fills_card_details_and_expiry() {
        let router_data = authorize_router_data(Ok(PaymentsResponseData {
            connector_transaction_id: "ch_1".to_string(),
            amount: Some(MinorUnit::new(100)),
            payment_method: Some(visa()),
        }));
        let transaction = generate_payment_authorize_response(Transaction::default(), router_data);

        assert_eq!(transaction.kind, Some(TransactionKind::Authorize));
        assert_eq!(transaction.status, Some(TransactionStatus::Success));
        assert_eq!(transaction.authorization.as_deref(), Some("ch_1"));
        assert!(transaction.authorization_exp.is_some());

        let details = transaction.payment_details.expect("details present");
        assert_eq!(details.gateway.as_deref(), Some("stripe"));
        assert_eq!(details.payment_type.as_deref(), Some("credit_card"));
        assert_eq!(details.avs_result_code.as_deref(), Some("Y"));
        assert_eq!(details.credit_card_company.as_deref(), Some("Visa"));
        assert_eq!(details.credit_card_number.as_deref(), Some("**** **** **** 4242"));
        assert_eq!(details.credit_card_exp_month, Some(8));
        assert_eq!(details.credit_card_exp_year, Some(2030));
        assert_eq!(details.cvv_result_code.as_deref(), Some("pass"));
    }

    #[test]
    fn declined_authorization_resolves_to_failure() {
        let router_data = authorize_router_data(Err(ErrorResponse {
            code: "card_declined".to_string(),
            message: "Your card was declined.".to_string(),
            status_code: 402,
            error_code: ErrorCode::CardDeclined,
            ..Default::default()
        }));
        let transaction = generate_payment_authorize_response(Transaction::default(), router_data);

        assert_eq!(transaction.status, Some(TransactionStatus::Failure));
        assert_eq!(transaction.error_code, Some(ErrorCode::CardDeclined));
        assert_eq!(transaction.error_message.as_deref(), Some("Your card was declined."));
        assert!(transaction.authorization_exp.is_none());
        assert!(transaction.authorization.is_none());
    }

    #[test]
    fn non_card_sources_only_report_their_type() {
        let mut details = PaymentDetails::for_gateway();
        fill_payment_details(
            &mut details,
            &PaymentMethodDetails {
                object: Some("bank_account".to_string()),
                funding: None,
                ..Default::default()
            },
        );
        assert_eq!(details.payment_type.as_deref(), Some("bank_account"));
        assert!(details.avs_result_code.is_none());
        assert!(details.credit_card_number.is_none());
    }

    #[test]
    fn connector_errors_map_to_application_errors() {
        let error = ErrorResponse {
            status_code: 404,
            error_code: ErrorCode::ProcessingError,
            message: "No such customer: cus_missing".to_string(),
            ..Default::default()
        };
        match ApplicationErrorResponse::foreign_from(error) {
            ApplicationErrorResponse::NotFound(api_error) => {
                assert_eq!(api_error.sub_code, "processing_error");
                assert_eq!(api_error.error_identifier, 404);
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }
}
