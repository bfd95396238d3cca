/// Generates a handler that reads the gateway context from the headers, decodes the JSON body
/// and hands both to a service method.
macro_rules! http_handler {
    ($fn_name:ident, $req_type:ty, $resp_type:ty, $service_method:ident, $service_field:ident) => {
        pub async fn $fn_name(
            axum::extract::State(state): axum::extract::State<$crate::http::state::AppState>,
            headers: axum::http::HeaderMap,
            $crate::http::utils::ValidatedJson(payload): $crate::http::utils::ValidatedJson<
                $req_type,
            >,
        ) -> Result<axum::Json<$resp_type>, $crate::http::error::HttpError> {
            let context = $crate::utils::GatewayContext::from_headers(&headers)?;
            let response = state
                .$service_field
                .$service_method(&context, payload)
                .await?;
            Ok(axum::Json(response))
        }
    };
}

pub(crate) use http_handler;
