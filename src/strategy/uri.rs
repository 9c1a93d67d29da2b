use super::{text_response, Strategy};
use crate::error::DispatchError;
use crate::handler::{Argument, Arguments, HandlerOutput};
use crate::router::ParamVec;
use crate::server::{HandlerRequest, HandlerResponse};
use std::sync::Arc;

/// Handlers receive the path parameter values positionally, in the order the
/// placeholders appear in the pattern.
#[derive(Debug, Clone, Copy, Default)]
pub struct UriStrategy;

impl Strategy for UriStrategy {
    fn name(&self) -> &'static str {
        "uri"
    }

    fn resolve_arguments(&self, path_params: &ParamVec, _request: &Arc<HandlerRequest>) -> Arguments {
        Arguments::positional(
            path_params
                .iter()
                .map(|(_, value)| Argument::Param(value.clone()))
                .collect(),
        )
    }

    fn build_response(&self, output: HandlerOutput) -> Result<HandlerResponse, DispatchError> {
        text_response(self.name(), output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_params_in_declaration_order() {
        let request = Arc::new(HandlerRequest::new(Method::GET, "/route/2/phil"));
        let mut params = ParamVec::new();
        params.push((Arc::from("id"), "2".to_string()));
        params.push((Arc::from("name"), "phil".to_string()));

        let args = UriStrategy.resolve_arguments(&params, &request);
        assert_eq!(args.len(), 2);
        assert_eq!(args.param(0), Some("2"));
        assert_eq!(args.param(1), Some("phil"));
        assert!(args.request().is_none());
    }
}
