use super::{text_response, Strategy};
use crate::error::DispatchError;
use crate::handler::{Arguments, HandlerOutput};
use crate::router::ParamVec;
use crate::server::{HandlerRequest, HandlerResponse};
use std::sync::Arc;

/// Path parameters are matched to the handler's declared parameter names.
///
/// Binding happens in the resolver, so only class methods registered with
/// parameter names (see [`Service::method_with_params`](crate::resolver::Service::method_with_params))
/// are reordered. Other handlers read the values with [`Arguments::named`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MethodArgumentStrategy;

impl Strategy for MethodArgumentStrategy {
    fn name(&self) -> &'static str {
        "method_argument"
    }

    fn resolve_arguments(&self, path_params: &ParamVec, _request: &Arc<HandlerRequest>) -> Arguments {
        Arguments::by_name(path_params.clone())
    }

    fn build_response(&self, output: HandlerOutput) -> Result<HandlerResponse, DispatchError> {
        text_response(self.name(), output)
    }
}
