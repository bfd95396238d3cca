use std::sync::Arc;

use connector_integration::{
    connectors::stripe::transformers::PROCESSABLE_EVENT_TYPES, types::ConnectorData,
};
use domain_types::{
    connector_flow::{FlowName, RetrieveEvent},
    connector_types::{
        ConnectorWebhookSecrets, EventFlowData, EventResponseData, EventRetrieveData,
        RequestDetails,
    },
    types::generate_event_response,
};
use external_services::shared_metrics::WEBHOOK_EVENTS_RECEIVED;
use gateway_api_types::webhooks::WebhookEvent;
use hyperswitch_masking::PeekInterface;
use interfaces::connector_integration_v2::BoxedConnectorIntegrationV2;

use crate::{
    configs::Config,
    http::error::HttpError,
    logger::instrument,
    server::{connector_auth, run_flow},
    utils::GatewayContext,
};

/// Metric label for event types outside the processable set
const OTHER_EVENT_TYPE: &str = "other";

/// Unverified deliveries may carry any type, so only known types become labels
fn event_type_label(event_type: &str) -> &str {
    if PROCESSABLE_EVENT_TYPES.contains(&event_type) {
        event_type
    } else {
        OTHER_EVENT_TYPE
    }
}

#[derive(Clone)]
pub struct Webhooks {
    pub config: Arc<Config>,
}

impl Webhooks {
    fn webhook_secrets(&self) -> Option<ConnectorWebhookSecrets> {
        self.config
            .stripe
            .webhook_secret
            .as_ref()
            .map(|secret| ConnectorWebhookSecrets {
                secret: secret.peek().as_bytes().to_vec(),
                tolerance_secs: self.config.stripe.webhook_tolerance_secs,
            })
    }

    /// Verifies and normalizes one delivered event
    #[instrument(name = "webhook_event", skip_all, fields(gateway = %context.connector))]
    pub fn webhook(
        &self,
        context: &GatewayContext,
        request: RequestDetails,
    ) -> Result<WebhookEvent, HttpError> {
        let connector_data = ConnectorData::get_connector_by_name(&context.connector);
        let event = connector_data
            .connector
            .process_webhook_event(
                request,
                self.webhook_secrets(),
                Some(connector_auth(&self.config, context)),
            )
            .inspect_err(|error| tracing::warn!(?error, "rejected webhook delivery"))?;

        let gateway = context.connector.to_string();
        let event_type = event.event_type.as_deref().unwrap_or_default();
        let ignored = event.ignored.unwrap_or(false);
        WEBHOOK_EVENTS_RECEIVED
            .with_label_values(&[
                gateway.as_str(),
                event_type_label(event_type),
                if ignored { "true" } else { "false" },
            ])
            .inc();
        tracing::info!(event_id = ?event.id, event_type, ignored, "webhook event normalized");

        Ok(event)
    }

    /// Fetches the event by id from the gateway, proving it was issued there
    #[instrument(name = "validate_event", skip_all, fields(gateway = %context.connector))]
    pub async fn validate_event(
        &self,
        context: &GatewayContext,
        event_id: String,
    ) -> Result<WebhookEvent, HttpError> {
        let connector_data = ConnectorData::get_connector_by_name(&context.connector);
        let connector_integration: BoxedConnectorIntegrationV2<
            '_,
            RetrieveEvent,
            EventFlowData,
            EventRetrieveData,
            EventResponseData,
        > = connector_data.connector.get_connector_integration_v2();

        let event_flow_data = EventFlowData {
            connectors: self.config.connectors.clone(),
        };
        let router_data = run_flow(
            &self.config,
            context,
            connector_integration,
            event_flow_data,
            EventRetrieveData { event_id },
            FlowName::RetrieveEvent,
        )
        .await?;

        Ok(generate_event_response(router_data)?)
    }
}
