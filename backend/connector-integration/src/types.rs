use domain_types::errors::{ApiError, ApplicationErrorResponse};
use domain_types::utils::ForeignTryFrom;
use interfaces::connector_types::BoxedConnector;

use crate::connectors::Stripe;

#[derive(Clone, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ConnectorEnum {
    Stripe,
}

impl ForeignTryFrom<&str> for ConnectorEnum {
    type Error = ApplicationErrorResponse;

    fn foreign_try_from(gateway: &str) -> Result<Self, error_stack::Report<Self::Error>> {
        gateway.to_ascii_lowercase().parse::<Self>().map_err(|_| {
            ApplicationErrorResponse::BadRequest(ApiError {
                sub_code: "INVALID_GATEWAY".to_owned(),
                error_identifier: 400,
                error_message: format!("Invalid value for gateway: {gateway}"),
                error_object: None,
            })
            .into()
        })
    }
}

#[derive(Clone)]
pub struct ConnectorData {
    pub connector: BoxedConnector,
    pub connector_name: ConnectorEnum,
}

impl ConnectorData {
    pub fn get_connector_by_name(connector_name: &ConnectorEnum) -> Self {
        let connector = Self::convert_connector(connector_name.clone());
        Self {
            connector,
            connector_name: connector_name.clone(),
        }
    }

    fn convert_connector(connector_name: ConnectorEnum) -> BoxedConnector {
        match connector_name {
            ConnectorEnum::Stripe => Box::new(Stripe::new()),
        }
    }
}

pub struct ResponseRouterData<Response, RouterData> {
    pub response: Response,
    pub router_data: RouterData,
    pub http_code: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_names_are_case_insensitive() {
        assert_eq!(
            ConnectorEnum::foreign_try_from("Stripe").ok(),
            Some(ConnectorEnum::Stripe)
        );
    }

    #[test]
    fn unknown_gateway_is_a_bad_request() {
        let error = ConnectorEnum::foreign_try_from("braintree").err();
        assert!(error.is_some_and(|report| matches!(
            report.current_context(),
            ApplicationErrorResponse::BadRequest(api_error) if api_error.sub_code == "INVALID_GATEWAY"
        )));
    }
}
