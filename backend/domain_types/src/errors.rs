use strum::Display;

#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum ApiClientError {
    #[error("Header map construction failed")]
    HeaderMapConstructionFailed,
    #[error("Invalid proxy configuration")]
    InvalidProxyConfiguration,
    #[error("Client construction failed")]
    ClientConstructionFailed,
    #[error("Request body serialization failed")]
    BodySerializationFailed,
    #[error("URL encoding of request payload failed")]
    UrlEncodingFailed,
    #[error("Failed to send request to connector {0}")]
    RequestNotSent(String),
    #[error("Failed to decode response")]
    ResponseDecodingFailed,
    #[error("Server responded with Request Timeout")]
    RequestTimeoutReceived,
    #[error("Server responded with unexpected response")]
    UnexpectedServerResponse,
}

#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum ConnectorError {
    #[error("Failed to obtain authentication type")]
    FailedToObtainAuthType,
    #[error("Failed to encode connector request")]
    RequestEncodingFailed,
    #[error("Request encoding failed : {0}")]
    RequestEncodingFailedWithReason(String),
    #[error("Failed to deserialize connector response")]
    ResponseDeserializationFailed,
    #[error("Failed to handle connector response")]
    ResponseHandlingFailed,
    #[error("Missing required field: {field_name}")]
    MissingRequiredField { field_name: &'static str },
    #[error("Failed to execute a processing step: {0:?}")]
    ProcessingStepFailed(Option<bytes::Bytes>),
    #[error("{0} is not implemented")]
    NotImplemented(String),
    #[error("Invalid connector configuration: {config}")]
    InvalidConnectorConfig { config: &'static str },
    #[error("Failed to parse date time")]
    DateFormattingFailed,
}

/// Failures while accepting an inbound gateway event
#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum WebhookError {
    #[error("Failed to decode webhook body")]
    BodyDecodingFailed,
    #[error("Requires a data attribute as an object")]
    DataNotAnObject,
    #[error("Requires a data.object attribute as an object")]
    DataObjectNotAnObject,
    #[error("Webhook signature header is missing or malformed")]
    SignatureNotFound,
    #[error("Webhook signature verification failed")]
    SourceVerificationFailed,
    #[error("Webhook timestamp is outside the tolerance window")]
    TimestampOutsideTolerance,
}

#[derive(Debug, Clone, thiserror::Error, Display)]
pub enum ApplicationErrorResponse {
    Unauthorized(ApiError),
    NotFound(ApiError),
    BadRequest(ApiError),
    Unprocessable(ApiError),
    InternalServerError(ApiError),
    NotImplemented(ApiError),
    BadGateway(ApiError),
}

impl ApplicationErrorResponse {
    pub fn api_error(&self) -> &ApiError {
        match self {
            Self::Unauthorized(error)
            | Self::NotFound(error)
            | Self::BadRequest(error)
            | Self::Unprocessable(error)
            | Self::InternalServerError(error)
            | Self::NotImplemented(error)
            | Self::BadGateway(error) => error,
        }
    }
}

#[derive(Debug, serde::Serialize, Clone)]
pub struct ApiError {
    pub sub_code: String,
    pub error_identifier: u16,
    pub error_message: String,
    pub error_object: Option<serde_json::Value>,
}
