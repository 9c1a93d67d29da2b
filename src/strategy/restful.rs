//! JSON-oriented strategy.

use super::Strategy;
use crate::error::DispatchError;
use crate::handler::{Argument, Arguments, HandlerOutput};
use crate::http_error::HttpError;
use crate::router::ParamVec;
use crate::server::{HandlerRequest, HandlerResponse};
use http::Method;
use serde_json::Value;
use std::sync::Arc;

/// Handlers receive the request and return a response or JSON data.
///
/// Unmatched paths, disallowed methods and [`HttpError`] failures are all
/// rendered as `{"status_code": .., "message": ..}` JSON responses instead of
/// propagating to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestfulStrategy;

impl Strategy for RestfulStrategy {
    fn name(&self) -> &'static str {
        "restful"
    }

    fn resolve_arguments(&self, path_params: &ParamVec, request: &Arc<HandlerRequest>) -> Arguments {
        Arguments::positional(vec![Argument::Request(Arc::clone(request))])
            .with_named(path_params.clone())
    }

    fn build_response(&self, output: HandlerOutput) -> Result<HandlerResponse, DispatchError> {
        match output {
            HandlerOutput::Response(resp) => Ok(resp),
            HandlerOutput::Json(value @ (Value::Array(_) | Value::Object(_))) => {
                Ok(HandlerResponse::json(200, &value))
            }
            other => Err(DispatchError::ResponseBuild {
                strategy: self.name(),
                found: other.kind(),
                expected: "expected a response or a JSON array or object",
            }),
        }
    }

    fn build_not_found_response(&self) -> Option<HandlerResponse> {
        Some(HttpError::not_found().to_response())
    }

    fn build_method_not_allowed_response(&self, allowed: &[Method]) -> Option<HandlerResponse> {
        Some(HttpError::method_not_allowed(allowed).to_response())
    }

    fn build_exception_response(&self, error: anyhow::Error) -> Result<HandlerResponse, anyhow::Error> {
        match error.downcast_ref::<HttpError>() {
            Some(http_error) => Ok(http_error.to_response()),
            None => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_arguments_carry_request_and_named_params() {
        let request = Arc::new(HandlerRequest::new(Method::GET, "/users/7"));
        let mut params = ParamVec::new();
        params.push((Arc::from("id"), "7".to_string()));

        let args = RestfulStrategy.resolve_arguments(&params, &request);
        assert_eq!(args.len(), 1);
        assert_eq!(args.request(), Some(&request));
        assert_eq!(args.named("id"), Some("7"));
    }

    #[test]
    fn test_json_collections_become_ok_responses() {
        let resp = RestfulStrategy
            .build_response(json!({"id": 1, "name": "rex"}).into())
            .unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.content(), r#"{"id":1,"name":"rex"}"#);
        assert_eq!(resp.get_header("content-type"), Some("application/json"));
    }

    #[test]
    fn test_scalars_are_rejected() {
        let err = RestfulStrategy.build_response("plain".into()).unwrap_err();
        assert!(matches!(err, DispatchError::ResponseBuild { found: "text", .. }));
    }

    #[test]
    fn test_not_found_body() {
        let resp = RestfulStrategy.build_not_found_response().unwrap();
        assert_eq!(resp.status, 404);
        assert_eq!(resp.content(), r#"{"status_code":404,"message":"Not Found"}"#);
    }

    #[test]
    fn test_exception_response_only_renders_http_errors() {
        let resp = RestfulStrategy
            .build_exception_response(HttpError::conflict().into())
            .unwrap();
        assert_eq!(resp.status, 409);
        assert_eq!(resp.content(), r#"{"status_code":409,"message":"Conflict"}"#);

        let other = RestfulStrategy.build_exception_response(anyhow::anyhow!("boom"));
        assert_eq!(other.unwrap_err().to_string(), "boom");
    }
}
