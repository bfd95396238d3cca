pub mod customers;
pub mod payments;
pub mod webhooks;

use common_utils::CustomResult;
use domain_types::{
    connector_flow::FlowName, errors::ConnectorError, router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
};
use external_services::service::execute_connector_processing_step;
use interfaces::connector_integration_v2::BoxedConnectorIntegrationV2;

use crate::{configs::Config, utils::GatewayContext};

/// Credentials for one call: the request's own key, else the configured secret key
pub(crate) fn connector_auth(config: &Config, context: &GatewayContext) -> ConnectorAuthType {
    ConnectorAuthType::from_keys(context.api_key.clone(), config.stripe.secret_key.clone())
}

/// Runs a single connector flow against the gateway
pub(crate) async fn run_flow<F, ResourceCommonData, Req, Resp>(
    config: &Config,
    context: &GatewayContext,
    connector_integration: BoxedConnectorIntegrationV2<'_, F, ResourceCommonData, Req, Resp>,
    resource_common_data: ResourceCommonData,
    request: Req,
    flow: FlowName,
) -> CustomResult<RouterDataV2<F, ResourceCommonData, Req, Resp>, ConnectorError>
where
    F: Clone + 'static,
    Req: Clone + std::fmt::Debug + 'static,
    Resp: Clone + std::fmt::Debug + 'static,
    ResourceCommonData: Clone + 'static,
{
    let router_data = RouterDataV2::new(
        resource_common_data,
        connector_auth(config, context),
        request,
    );

    execute_connector_processing_step(&config.proxy, connector_integration, router_data, flow).await
}
