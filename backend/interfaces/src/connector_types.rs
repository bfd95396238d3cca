use domain_types::{
    connector_flow,
    connector_types::{
        ConnectorWebhookSecrets, CustomerCreateData, CustomerFlowData, CustomerLookupData,
        CustomerResponseData, CustomerUpdateData, EventFlowData, EventResponseData,
        EventRetrieveData, PaymentFlowData, PaymentVoidData, PaymentsAuthorizeData,
        PaymentsCaptureData, PaymentsResponseData, RefundFlowData, RefundsData,
        RefundsResponseData, RequestDetails, SourceCreateData, SourceListData,
        SourceListResponseData, SourceLookupData, SourceRemoveResponseData, SourceResponseData,
        SourceUpdateData,
    },
    errors::WebhookError,
    router_data::ConnectorAuthType,
};
use gateway_api_types::webhooks::WebhookEvent;

use crate::{api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2};

pub trait ConnectorServiceTrait:
    ConnectorCommon
    + ValidationTrait
    + PaymentAuthorizeV2
    + PaymentSaleV2
    + PaymentCapture
    + PaymentVoidV2
    + RefundV2
    + CustomerCreate
    + CustomerUpdate
    + CustomerFind
    + SourceCreate
    + SourceUpdate
    + SourceFind
    + SourceRemove
    + SourceList
    + EventRetrieve
    + IncomingWebhook
{
}

pub type BoxedConnector = Box<&'static (dyn ConnectorServiceTrait + Sync)>;

pub trait ValidationTrait {
    /// Whether deliveries carry a signature worth checking when a secret is configured
    fn should_verify_webhook_source(&self) -> bool {
        false
    }
}

pub trait PaymentAuthorizeV2:
    ConnectorIntegrationV2<
    connector_flow::Authorize,
    PaymentFlowData,
    PaymentsAuthorizeData,
    PaymentsResponseData,
>
{
}

pub trait PaymentSaleV2:
    ConnectorIntegrationV2<
    connector_flow::Sale,
    PaymentFlowData,
    PaymentsAuthorizeData,
    PaymentsResponseData,
>
{
}

pub trait PaymentCapture:
    ConnectorIntegrationV2<
    connector_flow::Capture,
    PaymentFlowData,
    PaymentsCaptureData,
    PaymentsResponseData,
>
{
}

pub trait PaymentVoidV2:
    ConnectorIntegrationV2<connector_flow::Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>
{
}

pub trait RefundV2:
    ConnectorIntegrationV2<connector_flow::Refund, RefundFlowData, RefundsData, RefundsResponseData>
{
}

pub trait CustomerCreate:
    ConnectorIntegrationV2<
    connector_flow::CreateCustomer,
    CustomerFlowData,
    CustomerCreateData,
    CustomerResponseData,
>
{
}

pub trait CustomerUpdate:
    ConnectorIntegrationV2<
    connector_flow::UpdateCustomer,
    CustomerFlowData,
    CustomerUpdateData,
    CustomerResponseData,
>
{
}

pub trait CustomerFind:
    ConnectorIntegrationV2<
    connector_flow::FindCustomer,
    CustomerFlowData,
    CustomerLookupData,
    CustomerResponseData,
>
{
}

pub trait SourceCreate:
    ConnectorIntegrationV2<
    connector_flow::CreateSource,
    CustomerFlowData,
    SourceCreateData,
    SourceResponseData,
>
{
}

pub trait SourceUpdate:
    ConnectorIntegrationV2<
    connector_flow::UpdateSource,
    CustomerFlowData,
    SourceUpdateData,
    SourceResponseData,
>
{
}

pub trait SourceFind:
    ConnectorIntegrationV2<
    connector_flow::FindSource,
    CustomerFlowData,
    SourceLookupData,
    SourceResponseData,
>
{
}

pub trait SourceRemove:
    ConnectorIntegrationV2<
    connector_flow::RemoveSource,
    CustomerFlowData,
    SourceLookupData,
    SourceRemoveResponseData,
>
{
}

pub trait SourceList:
    ConnectorIntegrationV2<
    connector_flow::ListSources,
    CustomerFlowData,
    SourceListData,
    SourceListResponseData,
>
{
}

pub trait EventRetrieve:
    ConnectorIntegrationV2<
    connector_flow::RetrieveEvent,
    EventFlowData,
    EventRetrieveData,
    EventResponseData,
>
{
}

pub trait IncomingWebhook {
    /// Checks the payload was signed by the connector. Connectors without signed
    /// deliveries accept everything.
    fn verify_webhook_source(
        &self,
        _request: &RequestDetails,
        _connector_webhook_secret: Option<ConnectorWebhookSecrets>,
        _connector_account_details: Option<ConnectorAuthType>,
    ) -> Result<bool, error_stack::Report<WebhookError>> {
        Ok(true)
    }

    /// Parses the delivered envelope and annotates it for downstream consumers
    fn process_webhook_event(
        &self,
        request: RequestDetails,
        connector_webhook_secret: Option<ConnectorWebhookSecrets>,
        connector_account_details: Option<ConnectorAuthType>,
    ) -> Result<WebhookEvent, error_stack::Report<WebhookError>>;
}
