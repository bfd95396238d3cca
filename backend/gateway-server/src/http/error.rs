use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common_enums::ErrorCode;
use domain_types::errors::{ApplicationErrorResponse, ConnectorError, WebhookError};
use serde::Serialize;

/// Code reported for malformed or unverifiable webhook deliveries
pub const VALIDATION_ERROR_CODE: &str = "E_VALIDATION";

#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl HttpError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: code.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        });
        (self.status, body).into_response()
    }
}

impl From<error_stack::Report<ApplicationErrorResponse>> for HttpError {
    fn from(report: error_stack::Report<ApplicationErrorResponse>) -> Self {
        let error = report.current_context();
        let status = match error {
            ApplicationErrorResponse::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApplicationErrorResponse::NotFound(_) => StatusCode::NOT_FOUND,
            ApplicationErrorResponse::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApplicationErrorResponse::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApplicationErrorResponse::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApplicationErrorResponse::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            ApplicationErrorResponse::BadGateway(_) => StatusCode::BAD_GATEWAY,
        };
        let api_error = error.api_error();
        Self {
            status,
            code: api_error.sub_code.clone(),
            message: api_error.error_message.clone(),
        }
    }
}

impl From<error_stack::Report<WebhookError>> for HttpError {
    fn from(report: error_stack::Report<WebhookError>) -> Self {
        Self::bad_request(VALIDATION_ERROR_CODE, report.current_context().to_string())
    }
}

impl From<error_stack::Report<ConnectorError>> for HttpError {
    fn from(report: error_stack::Report<ConnectorError>) -> Self {
        let error = report.current_context();
        match error {
            ConnectorError::MissingRequiredField { .. } => {
                Self::bad_request("MISSING_REQUIRED_FIELD", error.to_string())
            }
            ConnectorError::FailedToObtainAuthType => Self {
                status: StatusCode::UNAUTHORIZED,
                code: "MISSING_API_KEY".to_owned(),
                message: error.to_string(),
            },
            ConnectorError::RequestEncodingFailed
            | ConnectorError::RequestEncodingFailedWithReason(_)
            | ConnectorError::InvalidConnectorConfig { .. }
            | ConnectorError::NotImplemented(_) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "INTERNAL_SERVER_ERROR".to_owned(),
                message: error.to_string(),
            },
            ConnectorError::ResponseDeserializationFailed
            | ConnectorError::ResponseHandlingFailed
            | ConnectorError::ProcessingStepFailed(_)
            | ConnectorError::DateFormattingFailed => Self {
                status: StatusCode::BAD_GATEWAY,
                code: ErrorCode::ProcessingError.to_string(),
                message: error.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use domain_types::errors::ApiError;

    use super::*;

    #[test]
    fn application_errors_keep_their_sub_code() {
        let report = error_stack::report!(ApplicationErrorResponse::Unprocessable(ApiError {
            sub_code: "SOURCE_NOT_DELETED".to_owned(),
            error_identifier: 422,
            error_message: "Source card_1 was not deleted".to_owned(),
            error_object: None,
        }));
        let error = HttpError::from(report);
        assert_eq!(error.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error.code, "SOURCE_NOT_DELETED");
    }

    #[test]
    fn webhook_errors_are_validation_failures() {
        let error = HttpError::from(error_stack::report!(WebhookError::DataNotAnObject));
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.code, VALIDATION_ERROR_CODE);
        assert_eq!(error.message, "Requires a data attribute as an object");
    }

    #[test]
    fn transport_failures_are_bad_gateway() {
        let error = HttpError::from(error_stack::report!(ConnectorError::ProcessingStepFailed(
            None
        )));
        assert_eq!(error.status, StatusCode::BAD_GATEWAY);
        assert_eq!(error.code, "processing_error");
    }
}
