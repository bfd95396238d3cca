//! Glue that turns a connector's wire types into `ConnectorIntegrationV2` impls.
//!
//! `create_all_prerequisites!` declares the connector and the router data wrapper its request
//! transformers take. `macro_connector_implementation!` then writes one flow impl from the url
//! function, the HTTP method and the wire request and response types of that flow.

use common_utils::{errors::CustomResult, ext_traits::BytesExt};
use domain_types::errors::ConnectorError;
use error_stack::ResultExt;

/// Empty bodies are read as `{}` so flows answering with no content still deserialize
pub(crate) fn parse_response_body<T>(body: bytes::Bytes) -> CustomResult<T, ConnectorError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let body = if body.is_empty() {
        bytes::Bytes::from_static(b"{}")
    } else {
        body
    };
    body.parse_struct(std::any::type_name::<T>())
        .change_context(ConnectorError::ResponseDeserializationFailed)
}

macro_rules! create_all_prerequisites {
    (
        connector_name: $connector: ident,
        member_functions: {
            $($function_def: tt)*
        }
    ) => {
        paste::paste! {
            /// Router data of one flow paired with the connector handling it
            pub struct [<$connector RouterData>]<RD> {
                pub connector: $connector,
                pub router_data: RD,
            }
        }

        #[derive(Clone, Copy, Debug, Default)]
        pub struct $connector;

        impl $connector {
            pub const fn new() -> &'static Self {
                &Self
            }

            $($function_def)*
        }
    };
}
pub(crate) use create_all_prerequisites;

macro_rules! expand_default_functions {
    (get_headers, $flow: ident, $resource_common_data: ty, $request: ty, $response: ty) => {
        fn get_headers(
            &self,
            req: &domain_types::router_data_v2::RouterDataV2<
                $flow,
                $resource_common_data,
                $request,
                $response,
            >,
        ) -> common_utils::errors::CustomResult<
            Vec<(String, hyperswitch_masking::Maskable<String>)>,
            domain_types::errors::ConnectorError,
        > {
            self.build_headers(req)
        }
    };
    (get_content_type, $flow: ident, $resource_common_data: ty, $request: ty, $response: ty) => {
        fn get_content_type(&self) -> &'static str {
            self.common_get_content_type()
        }
    };
    (get_error_response_v2, $flow: ident, $resource_common_data: ty, $request: ty, $response: ty) => {
        fn get_error_response_v2(
            &self,
            res: domain_types::router_response_types::Response,
        ) -> common_utils::errors::CustomResult<
            domain_types::router_data::ErrorResponse,
            domain_types::errors::ConnectorError,
        > {
            self.build_error_response(res)
        }
    };
}
pub(crate) use expand_default_functions;

macro_rules! expand_fn_get_request_body {
    (
        $connector: ident,
        $flow: ident,
        $resource_common_data: ty,
        $request: ty,
        $response: ty,
        $content_type: ident($curl_req: ty)
    ) => {
        fn get_request_body(
            &self,
            req: &domain_types::router_data_v2::RouterDataV2<
                $flow,
                $resource_common_data,
                $request,
                $response,
            >,
        ) -> common_utils::errors::CustomResult<
            Option<common_utils::request::RequestContent>,
            domain_types::errors::ConnectorError,
        > {
            let input = paste::paste! {
                [<$connector RouterData>] {
                    connector: *self,
                    router_data: req.clone(),
                }
            };
            let body = <$curl_req>::try_from(input)?;
            Ok(Some(common_utils::request::RequestContent::$content_type(
                Box::new(body),
            )))
        }
    };
    ($connector: ident, $flow: ident, $resource_common_data: ty, $request: ty, $response: ty) => {
        fn get_request_body(
            &self,
            _req: &domain_types::router_data_v2::RouterDataV2<
                $flow,
                $resource_common_data,
                $request,
                $response,
            >,
        ) -> common_utils::errors::CustomResult<
            Option<common_utils::request::RequestContent>,
            domain_types::errors::ConnectorError,
        > {
            Ok(None)
        }
    };
}
pub(crate) use expand_fn_get_request_body;

macro_rules! macro_connector_implementation {
    (
        connector_default_implementations: [$($function_name: ident), *],
        connector: $connector: ident,
        $(curl_request: $content_type: ident($curl_req: ty),)?
        curl_response: $curl_res: ty,
        flow_name: $flow: ident,
        resource_common_data: $resource_common_data: ty,
        flow_request: $request: ty,
        flow_response: $response: ty,
        http_method: $http_method_type: ident,
        other_functions: {
            $($function_def: tt)*
        }
    ) => {
        impl ConnectorIntegrationV2<$flow, $resource_common_data, $request, $response>
            for $connector
        {
            fn get_http_method(&self) -> common_utils::request::Method {
                common_utils::request::Method::$http_method_type
            }

            $($function_def)*

            $(
                macros::expand_default_functions!(
                    $function_name,
                    $flow,
                    $resource_common_data,
                    $request,
                    $response
                );
            )*

            macros::expand_fn_get_request_body!(
                $connector,
                $flow,
                $resource_common_data,
                $request,
                $response
                $(, $content_type($curl_req))?
            );

            fn handle_response_v2(
                &self,
                data: &domain_types::router_data_v2::RouterDataV2<
                    $flow,
                    $resource_common_data,
                    $request,
                    $response,
                >,
                res: domain_types::router_response_types::Response,
            ) -> common_utils::errors::CustomResult<
                domain_types::router_data_v2::RouterDataV2<
                    $flow,
                    $resource_common_data,
                    $request,
                    $response,
                >,
                domain_types::errors::ConnectorError,
            > {
                let response: $curl_res = macros::parse_response_body(res.response)?;
                domain_types::router_data_v2::RouterDataV2::try_from(
                    $crate::types::ResponseRouterData {
                        response,
                        router_data: data.clone(),
                        http_code: res.status_code,
                    },
                )
            }
        }
    };
}
pub(crate) use macro_connector_implementation;
