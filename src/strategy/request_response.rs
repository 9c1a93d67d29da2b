use super::Strategy;
use crate::error::DispatchError;
use crate::handler::{Argument, Arguments, HandlerOutput};
use crate::router::ParamVec;
use crate::server::{HandlerRequest, HandlerResponse};
use std::sync::Arc;

/// Handlers receive the request and an empty 200 response, and must return a
/// response.
///
/// Path parameters are available on the request and through
/// [`Arguments::named`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestResponseStrategy;

impl Strategy for RequestResponseStrategy {
    fn name(&self) -> &'static str {
        "request_response"
    }

    fn resolve_arguments(&self, path_params: &ParamVec, request: &Arc<HandlerRequest>) -> Arguments {
        Arguments::positional(vec![
            Argument::Request(Arc::clone(request)),
            Argument::Response(HandlerResponse::new(200)),
        ])
        .with_named(path_params.clone())
    }

    fn build_response(&self, output: HandlerOutput) -> Result<HandlerResponse, DispatchError> {
        match output {
            HandlerOutput::Response(resp) => Ok(resp),
            other => Err(DispatchError::ResponseBuild {
                strategy: self.name(),
                found: other.kind(),
                expected: "expected a response",
            }),
        }
    }
}
