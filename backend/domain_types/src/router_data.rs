use common_enums::ErrorCode;
use common_utils::consts::{NO_ERROR_CODE, NO_ERROR_MESSAGE};
use hyperswitch_masking::Secret;

pub type Error = error_stack::Report<crate::errors::ConnectorError>;

#[derive(Default, Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(tag = "auth_type")]
pub enum ConnectorAuthType {
    HeaderKey {
        api_key: Secret<String>,
    },
    #[default]
    NoKey,
}

impl ConnectorAuthType {
    /// Picks the per-request key when one was supplied, the configured key otherwise
    pub fn from_keys(
        request_key: Option<Secret<String>>,
        configured_key: Option<Secret<String>>,
    ) -> Self {
        request_key
            .or(configured_key)
            .map(|api_key| Self::HeaderKey { api_key })
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ErrorResponse {
    /// Connector error code, e.g. `card_declined`
    pub code: String,
    pub message: String,
    pub reason: Option<String>,
    pub status_code: u16,
    /// Generic code the connector error resolves to
    pub error_code: ErrorCode,
    pub network_decline_code: Option<String>,
    pub raw_connector_response: Option<String>,
}

impl Default for ErrorResponse {
    fn default() -> Self {
        Self {
            code: NO_ERROR_CODE.to_string(),
            message: NO_ERROR_MESSAGE.to_string(),
            reason: None,
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            error_code: ErrorCode::ProcessingError,
            network_decline_code: None,
            raw_connector_response: None,
        }
    }
}
