use std::sync::Arc;

use connector_integration::types::ConnectorData;
use domain_types::{
    connector_flow::{
        CreateCustomer, CreateSource, FindCustomer, FindSource, FlowName, ListSources,
        RemoveSource, UpdateCustomer, UpdateSource,
    },
    connector_types::{
        CustomerCreateData, CustomerFlowData, CustomerLookupData, CustomerResponseData,
        CustomerUpdateData, SourceCreateData, SourceListData, SourceListResponseData,
        SourceLookupData, SourceRemoveResponseData, SourceResponseData, SourceUpdateData,
    },
    types::{
        generate_customer_response, generate_source_list_response,
        generate_source_remove_response, generate_source_response,
    },
    utils::{ForeignFrom, ForeignTryFrom},
};
use gateway_api_types::customers::{Customer, Source};
use interfaces::connector_integration_v2::BoxedConnectorIntegrationV2;

use crate::{
    configs::Config, http::error::HttpError, logger::instrument, server::run_flow,
    utils::GatewayContext,
};

/// Stored customers and their saved card sources. Gateway errors are surfaced as errors,
/// not folded into the record.
#[derive(Clone)]
pub struct Customers {
    pub config: Arc<Config>,
}

impl Customers {
    fn customer_flow_data(&self) -> CustomerFlowData {
        CustomerFlowData {
            connectors: self.config.connectors.clone(),
        }
    }

    #[instrument(name = "create_customer", skip_all, fields(gateway = %context.connector))]
    pub async fn create_customer(
        &self,
        context: &GatewayContext,
        customer: Customer,
    ) -> Result<Customer, HttpError> {
        let connector_data = ConnectorData::get_connector_by_name(&context.connector);
        let connector_integration: BoxedConnectorIntegrationV2<
            '_,
            CreateCustomer,
            CustomerFlowData,
            CustomerCreateData,
            CustomerResponseData,
        > = connector_data.connector.get_connector_integration_v2();

        let router_data = run_flow(
            &self.config,
            context,
            connector_integration,
            self.customer_flow_data(),
            CustomerCreateData::foreign_from(&customer),
            FlowName::CreateCustomer,
        )
        .await?;

        Ok(generate_customer_response(customer, router_data)?)
    }

    #[instrument(name = "update_customer", skip_all, fields(gateway = %context.connector))]
    pub async fn update_customer(
        &self,
        context: &GatewayContext,
        customer: Customer,
    ) -> Result<Customer, HttpError> {
        let request = CustomerUpdateData::foreign_try_from(&customer)?;

        let connector_data = ConnectorData::get_connector_by_name(&context.connector);
        let connector_integration: BoxedConnectorIntegrationV2<
            '_,
            UpdateCustomer,
            CustomerFlowData,
            CustomerUpdateData,
            CustomerResponseData,
        > = connector_data.connector.get_connector_integration_v2();

        let router_data = run_flow(
            &self.config,
            context,
            connector_integration,
            self.customer_flow_data(),
            request,
            FlowName::UpdateCustomer,
        )
        .await?;

        Ok(generate_customer_response(customer, router_data)?)
    }

    #[instrument(name = "find_customer", skip_all, fields(gateway = %context.connector))]
    pub async fn find_customer(
        &self,
        context: &GatewayContext,
        customer: Customer,
    ) -> Result<Customer, HttpError> {
        let request = CustomerLookupData::foreign_try_from(&customer)?;

        let connector_data = ConnectorData::get_connector_by_name(&context.connector);
        let connector_integration: BoxedConnectorIntegrationV2<
            '_,
            FindCustomer,
            CustomerFlowData,
            CustomerLookupData,
            CustomerResponseData,
        > = connector_data.connector.get_connector_integration_v2();

        let router_data = run_flow(
            &self.config,
            context,
            connector_integration,
            self.customer_flow_data(),
            request,
            FlowName::FindCustomer,
        )
        .await?;

        Ok(generate_customer_response(customer, router_data)?)
    }

    #[instrument(name = "create_customer_source", skip_all, fields(gateway = %context.connector))]
    pub async fn create_customer_source(
        &self,
        context: &GatewayContext,
        source: Source,
    ) -> Result<Source, HttpError> {
        let request = SourceCreateData::foreign_try_from(&source)?;

        let connector_data = ConnectorData::get_connector_by_name(&context.connector);
        let connector_integration: BoxedConnectorIntegrationV2<
            '_,
            CreateSource,
            CustomerFlowData,
            SourceCreateData,
            SourceResponseData,
        > = connector_data.connector.get_connector_integration_v2();

        let router_data = run_flow(
            &self.config,
            context,
            connector_integration,
            self.customer_flow_data(),
            request,
            FlowName::CreateSource,
        )
        .await?;

        Ok(generate_source_response(source, router_data)?)
    }

    #[instrument(name = "update_customer_source", skip_all, fields(gateway = %context.connector))]
    pub async fn update_customer_source(
        &self,
        context: &GatewayContext,
        source: Source,
    ) -> Result<Source, HttpError> {
        let request = SourceUpdateData::foreign_try_from(&source)?;

        let connector_data = ConnectorData::get_connector_by_name(&context.connector);
        let connector_integration: BoxedConnectorIntegrationV2<
            '_,
            UpdateSource,
            CustomerFlowData,
            SourceUpdateData,
            SourceResponseData,
        > = connector_data.connector.get_connector_integration_v2();

        let router_data = run_flow(
            &self.config,
            context,
            connector_integration,
            self.customer_flow_data(),
            request,
            FlowName::UpdateSource,
        )
        .await?;

        Ok(generate_source_response(source, router_data)?)
    }

    #[instrument(name = "find_customer_source", skip_all, fields(gateway = %context.connector))]
    pub async fn find_customer_source(
        &self,
        context: &GatewayContext,
        source: Source,
    ) -> Result<Source, HttpError> {
        let request = SourceLookupData::foreign_try_from(&source)?;

        let connector_data = ConnectorData::get_connector_by_name(&context.connector);
        let connector_integration: BoxedConnectorIntegrationV2<
            '_,
            FindSource,
            CustomerFlowData,
            SourceLookupData,
            SourceResponseData,
        > = connector_data.connector.get_connector_integration_v2();

        let router_data = run_flow(
            &self.config,
            context,
            connector_integration,
            self.customer_flow_data(),
            request,
            FlowName::FindSource,
        )
        .await?;

        Ok(generate_source_response(source, router_data)?)
    }

    #[instrument(name = "remove_customer_source", skip_all, fields(gateway = %context.connector))]
    pub async fn remove_customer_source(
        &self,
        context: &GatewayContext,
        source: Source,
    ) -> Result<Source, HttpError> {
        let request = SourceLookupData::foreign_try_from(&source)?;

        let connector_data = ConnectorData::get_connector_by_name(&context.connector);
        let connector_integration: BoxedConnectorIntegrationV2<
            '_,
            RemoveSource,
            CustomerFlowData,
            SourceLookupData,
            SourceRemoveResponseData,
        > = connector_data.connector.get_connector_integration_v2();

        let router_data = run_flow(
            &self.config,
            context,
            connector_integration,
            self.customer_flow_data(),
            request,
            FlowName::RemoveSource,
        )
        .await?;

        Ok(generate_source_remove_response(source, router_data)?)
    }

    /// Card sources saved on the customer, in gateway order
    #[instrument(name = "get_customer_sources", skip_all, fields(gateway = %context.connector))]
    pub async fn get_customer_sources(
        &self,
        context: &GatewayContext,
        customer: Customer,
    ) -> Result<Vec<Source>, HttpError> {
        let request = SourceListData::foreign_try_from(&customer)?;

        let connector_data = ConnectorData::get_connector_by_name(&context.connector);
        let connector_integration: BoxedConnectorIntegrationV2<
            '_,
            ListSources,
            CustomerFlowData,
            SourceListData,
            SourceListResponseData,
        > = connector_data.connector.get_connector_integration_v2();

        let router_data = run_flow(
            &self.config,
            context,
            connector_integration,
            self.customer_flow_data(),
            request,
            FlowName::ListSources,
        )
        .await?;

        Ok(generate_source_list_response(&customer, router_data)?)
    }
}
