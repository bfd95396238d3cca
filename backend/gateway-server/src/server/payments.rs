use std::sync::Arc;

use common_enums::TransactionKind;
use connector_integration::types::ConnectorData;
use domain_types::{
    connector_flow::{Authorize, Capture, FlowName, Refund, Sale, Void},
    connector_types::{
        PaymentFlowData, PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData,
        PaymentsResponseData, RefundFlowData, RefundsData, RefundsResponseData,
    },
    errors::ConnectorError,
    types::{
        generate_payment_authorize_response, generate_payment_capture_response,
        generate_payment_sale_response, generate_payment_void_response, generate_refund_response,
        generate_transaction_failure,
    },
    utils::{ForeignFrom, ForeignTryFrom},
};
use gateway_api_types::payments::Transaction;
use interfaces::connector_integration_v2::BoxedConnectorIntegrationV2;
use tracing::info;

use crate::{
    configs::Config, http::error::HttpError, logger::instrument, server::run_flow,
    utils::GatewayContext,
};

#[derive(Clone)]
pub struct Payments {
    pub config: Arc<Config>,
}

impl Payments {
    fn payment_flow_data(&self, kind: TransactionKind) -> PaymentFlowData {
        PaymentFlowData {
            kind,
            connectors: self.config.connectors.clone(),
        }
    }

    /// Charges the card without capturing it
    #[instrument(name = "payment_authorize", skip_all, fields(gateway = %context.connector))]
    pub async fn authorize(
        &self,
        context: &GatewayContext,
        transaction: Transaction,
    ) -> Result<Transaction, HttpError> {
        let connector_data = ConnectorData::get_connector_by_name(&context.connector);
        let connector_integration: BoxedConnectorIntegrationV2<
            '_,
            Authorize,
            PaymentFlowData,
            PaymentsAuthorizeData,
            PaymentsResponseData,
        > = connector_data.connector.get_connector_integration_v2();

        let request = PaymentsAuthorizeData::foreign_from(&transaction);
        let result = run_flow(
            &self.config,
            context,
            connector_integration,
            self.payment_flow_data(TransactionKind::Authorize),
            request,
            FlowName::Authorize,
        )
        .await;

        match result {
            Ok(router_data) => Ok(generate_payment_authorize_response(transaction, router_data)),
            Err(error) => transaction_failure(transaction, TransactionKind::Authorize, error),
        }
    }

    /// Charges and captures in one call
    #[instrument(name = "payment_sale", skip_all, fields(gateway = %context.connector))]
    pub async fn sale(
        &self,
        context: &GatewayContext,
        transaction: Transaction,
    ) -> Result<Transaction, HttpError> {
        let connector_data = ConnectorData::get_connector_by_name(&context.connector);
        let connector_integration: BoxedConnectorIntegrationV2<
            '_,
            Sale,
            PaymentFlowData,
            PaymentsAuthorizeData,
            PaymentsResponseData,
        > = connector_data.connector.get_connector_integration_v2();

        let request = PaymentsAuthorizeData::foreign_from(&transaction);
        let result = run_flow(
            &self.config,
            context,
            connector_integration,
            self.payment_flow_data(TransactionKind::Sale),
            request,
            FlowName::Sale,
        )
        .await;

        match result {
            Ok(router_data) => Ok(generate_payment_sale_response(transaction, router_data)),
            Err(error) => transaction_failure(transaction, TransactionKind::Sale, error),
        }
    }

    #[instrument(name = "payment_capture", skip_all, fields(gateway = %context.connector))]
    pub async fn capture(
        &self,
        context: &GatewayContext,
        transaction: Transaction,
    ) -> Result<Transaction, HttpError> {
        let request = PaymentsCaptureData::foreign_try_from(&transaction)?;

        let connector_data = ConnectorData::get_connector_by_name(&context.connector);
        let connector_integration: BoxedConnectorIntegrationV2<
            '_,
            Capture,
            PaymentFlowData,
            PaymentsCaptureData,
            PaymentsResponseData,
        > = connector_data.connector.get_connector_integration_v2();

        let result = run_flow(
            &self.config,
            context,
            connector_integration,
            self.payment_flow_data(TransactionKind::Capture),
            request,
            FlowName::Capture,
        )
        .await;

        match result {
            Ok(router_data) => Ok(generate_payment_capture_response(transaction, router_data)),
            Err(error) => transaction_failure(transaction, TransactionKind::Capture, error),
        }
    }

    /// Releases an uncaptured charge by refunding it
    #[instrument(name = "payment_void", skip_all, fields(gateway = %context.connector))]
    pub async fn void(
        &self,
        context: &GatewayContext,
        transaction: Transaction,
    ) -> Result<Transaction, HttpError> {
        let request = PaymentVoidData::foreign_try_from(&transaction)?;

        let connector_data = ConnectorData::get_connector_by_name(&context.connector);
        let connector_integration: BoxedConnectorIntegrationV2<
            '_,
            Void,
            PaymentFlowData,
            PaymentVoidData,
            PaymentsResponseData,
        > = connector_data.connector.get_connector_integration_v2();

        let result = run_flow(
            &self.config,
            context,
            connector_integration,
            self.payment_flow_data(TransactionKind::Void),
            request,
            FlowName::Void,
        )
        .await;

        match result {
            Ok(router_data) => Ok(generate_payment_void_response(transaction, router_data)),
            Err(error) => transaction_failure(transaction, TransactionKind::Void, error),
        }
    }

    #[instrument(name = "payment_refund", skip_all, fields(gateway = %context.connector))]
    pub async fn refund(
        &self,
        context: &GatewayContext,
        transaction: Transaction,
    ) -> Result<Transaction, HttpError> {
        let request = RefundsData::foreign_try_from(&transaction)?;

        let connector_data = ConnectorData::get_connector_by_name(&context.connector);
        let connector_integration: BoxedConnectorIntegrationV2<
            '_,
            Refund,
            RefundFlowData,
            RefundsData,
            RefundsResponseData,
        > = connector_data.connector.get_connector_integration_v2();

        let refund_flow_data = RefundFlowData {
            connectors: self.config.connectors.clone(),
        };
        let result = run_flow(
            &self.config,
            context,
            connector_integration,
            refund_flow_data,
            request,
            FlowName::Refund,
        )
        .await;

        match result {
            Ok(router_data) => Ok(generate_refund_response(transaction, router_data)),
            Err(error) => transaction_failure(transaction, TransactionKind::Refund, error),
        }
    }
}

/// Errors raised before anything was sent, which the caller has to fix
fn is_request_error(error: &ConnectorError) -> bool {
    matches!(
        error,
        ConnectorError::MissingRequiredField { .. }
            | ConnectorError::FailedToObtainAuthType
            | ConnectorError::RequestEncodingFailed
            | ConnectorError::RequestEncodingFailedWithReason(_)
            | ConnectorError::InvalidConnectorConfig { .. }
            | ConnectorError::NotImplemented(_)
    )
}

/// Gateway failures still resolve with the transaction, marked failed
fn transaction_failure(
    transaction: Transaction,
    kind: TransactionKind,
    error: error_stack::Report<ConnectorError>,
) -> Result<Transaction, HttpError> {
    if is_request_error(error.current_context()) {
        return Err(HttpError::from(error));
    }
    info!(%kind, ?error, "gateway call failed, marking transaction as failed");
    let reason = error.current_context().to_string();
    Ok(generate_transaction_failure(transaction, kind, reason))
}

#[cfg(test)]
mod tests {
    use common_enums::{ErrorCode, TransactionStatus};

    use super::*;

    #[test]
    fn transport_errors_mark_the_transaction_failed() {
        let report = error_stack::report!(ConnectorError::ProcessingStepFailed(None));
        let result = transaction_failure(Transaction::default(), TransactionKind::Sale, report);

        let transaction = result.ok();
        assert_eq!(
            transaction.as_ref().and_then(|t| t.status),
            Some(TransactionStatus::Failure)
        );
        assert_eq!(
            transaction.as_ref().and_then(|t| t.error_code),
            Some(ErrorCode::ProcessingError)
        );
        assert_eq!(
            transaction.and_then(|t| t.kind),
            Some(TransactionKind::Sale)
        );
    }

    #[test]
    fn missing_credentials_are_rejected() {
        let report = error_stack::report!(ConnectorError::FailedToObtainAuthType);
        let result = transaction_failure(Transaction::default(), TransactionKind::Sale, report);
        assert!(result.is_err_and(|error| error.status == http::StatusCode::UNAUTHORIZED));
    }
}
