use common_utils::CustomResult;
use domain_types::{
    errors::ConnectorError,
    router_data::{ConnectorAuthType, ErrorResponse},
    router_response_types::Response,
    types::Connectors,
};
use error_stack::report;
use hyperswitch_masking::Maskable;

/// Identity and transport details shared by every flow of a connector
pub trait ConnectorCommon {
    /// Lowercase connector name, as used in routes and metric labels
    fn id(&self) -> &'static str;

    /// Headers carrying the credentials. Connectors that authenticate must override this.
    fn get_auth_header(
        &self,
        _auth_type: &ConnectorAuthType,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, ConnectorError> {
        Err(report!(ConnectorError::FailedToObtainAuthType))
    }

    fn common_get_content_type(&self) -> &'static str {
        "application/json"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors) -> &'a str;

    /// Fallback when the connector's error body has no known shape: keep the raw body as reason
    fn build_error_response(&self, res: Response) -> CustomResult<ErrorResponse, ConnectorError> {
        let raw_response = String::from_utf8(res.response.to_vec()).ok();
        Ok(ErrorResponse {
            status_code: res.status_code,
            reason: raw_response.clone(),
            raw_connector_response: raw_response,
            ..Default::default()
        })
    }
}
