//! # Strategy Module
//!
//! A strategy decides how a matched route talks to its handler: which
//! arguments the handler receives, how its return value becomes a response,
//! and whether 404, 405 and handler errors are rendered or propagated.
//!
//! ## Built-in strategies
//!
//! | Strategy                    | Arguments                      | Accepted output                    | 404/405/errors |
//! |-----------------------------|--------------------------------|------------------------------------|----------------|
//! | [`RestfulStrategy`]         | request, params by name        | response, JSON array/object        | rendered as JSON |
//! | [`UriStrategy`]             | path params, positionally      | response, text, numbers, nothing   | propagated |
//! | [`MethodArgumentStrategy`]  | path params bound by name      | response, text, numbers, nothing   | propagated |
//! | [`RequestResponseStrategy`] | request, empty 200 response    | response                           | propagated |
//!
//! A route without a strategy uses the collection default, and a collection
//! without one uses [`RequestResponseStrategy`].
//!
//! ## Custom strategies
//!
//! Implement [`Strategy`] to keep the dispatcher's pipeline but change one of
//! its steps. Implement [`CustomStrategy`] to take over the whole invocation;
//! its result is handed back to the caller untouched as
//! [`Dispatched::Raw`](crate::Dispatched::Raw).

mod method_argument;
mod request_response;
mod restful;
mod uri;

pub use method_argument::MethodArgumentStrategy;
pub use request_response::RequestResponseStrategy;
pub use restful::RestfulStrategy;
pub use uri::UriStrategy;

use crate::error::DispatchError;
use crate::handler::{Arguments, HandlerOutput, HandlerRef};
use crate::router::ParamVec;
use crate::server::{HandlerRequest, HandlerResponse};
use http::Method;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Response policy used by the dispatcher for one route.
///
/// Only argument resolution and response building are required. The error
/// hooks default to declining, which makes the dispatcher propagate the
/// corresponding [`DispatchError`] to the caller.
pub trait Strategy: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Compute the handler's arguments from the matched path parameters.
    fn resolve_arguments(&self, path_params: &ParamVec, request: &Arc<HandlerRequest>) -> Arguments;

    /// Turn the handler's return value into a response.
    fn build_response(&self, output: HandlerOutput) -> Result<HandlerResponse, DispatchError>;

    /// Response for a path nothing matches, or `None` to propagate.
    fn build_not_found_response(&self) -> Option<HandlerResponse> {
        None
    }

    /// Response for a path registered only for other methods, or `None` to propagate.
    fn build_method_not_allowed_response(&self, _allowed: &[Method]) -> Option<HandlerResponse> {
        None
    }

    /// Render a handler failure, or hand it back to propagate.
    fn build_exception_response(&self, error: anyhow::Error) -> Result<HandlerResponse, anyhow::Error> {
        Err(error)
    }
}

/// A strategy that performs the invocation itself.
///
/// Receives the handler exactly as registered (string references are not
/// resolved) together with the path parameters.
pub trait CustomStrategy: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn dispatch(&self, handler: &HandlerRef, path_params: &ParamVec) -> anyhow::Result<HandlerOutput>;
}

/// A strategy attached to a route or a collection.
#[derive(Clone)]
pub enum StrategyRef {
    Policy(Arc<dyn Strategy>),
    Custom(Arc<dyn CustomStrategy>),
}

impl StrategyRef {
    pub fn policy<S: Strategy + 'static>(strategy: S) -> Self {
        StrategyRef::Policy(Arc::new(strategy))
    }

    pub fn custom<C: CustomStrategy + 'static>(strategy: C) -> Self {
        StrategyRef::Custom(Arc::new(strategy))
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            StrategyRef::Policy(s) => s.name(),
            StrategyRef::Custom(s) => s.name(),
        }
    }

    /// Used when neither the route nor the collection names a strategy.
    pub(crate) fn fallback() -> Self {
        RequestResponseStrategy.into()
    }
}

impl fmt::Debug for StrategyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyRef::Policy(s) => f.debug_tuple("Policy").field(&s.name()).finish(),
            StrategyRef::Custom(s) => f.debug_tuple("Custom").field(&s.name()).finish(),
        }
    }
}

macro_rules! impl_from_builtin {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for StrategyRef {
                fn from(strategy: $ty) -> Self {
                    StrategyRef::policy(strategy)
                }
            }
        )*
    };
}

impl_from_builtin!(
    RestfulStrategy,
    UriStrategy,
    MethodArgumentStrategy,
    RequestResponseStrategy,
);

/// Built-in strategies selectable by name from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinStrategy {
    Restful,
    Uri,
    MethodArgument,
    RequestResponse,
}

impl BuiltinStrategy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BuiltinStrategy::Restful => "restful",
            BuiltinStrategy::Uri => "uri",
            BuiltinStrategy::MethodArgument => "method_argument",
            BuiltinStrategy::RequestResponse => "request_response",
        }
    }
}

impl fmt::Display for BuiltinStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuiltinStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "restful" | "json" => Ok(BuiltinStrategy::Restful),
            "uri" => Ok(BuiltinStrategy::Uri),
            "method_argument" => Ok(BuiltinStrategy::MethodArgument),
            "request_response" => Ok(BuiltinStrategy::RequestResponse),
            other => Err(format!("unknown strategy `{other}`")),
        }
    }
}

impl From<BuiltinStrategy> for StrategyRef {
    fn from(strategy: BuiltinStrategy) -> Self {
        match strategy {
            BuiltinStrategy::Restful => RestfulStrategy.into(),
            BuiltinStrategy::Uri => UriStrategy.into(),
            BuiltinStrategy::MethodArgument => MethodArgumentStrategy.into(),
            BuiltinStrategy::RequestResponse => RequestResponseStrategy.into(),
        }
    }
}

/// Shared by the URI and method-argument strategies: anything with an obvious
/// text form becomes a 200 text response.
pub(crate) fn text_response(
    strategy: &'static str,
    output: HandlerOutput,
) -> Result<HandlerResponse, DispatchError> {
    match output {
        HandlerOutput::Response(resp) => Ok(resp),
        HandlerOutput::Text(text) => Ok(HandlerResponse::text(200, text)),
        HandlerOutput::Empty | HandlerOutput::Json(Value::Null) => Ok(HandlerResponse::text(200, "")),
        HandlerOutput::Json(Value::String(text)) => Ok(HandlerResponse::text(200, text)),
        HandlerOutput::Json(Value::Number(n)) => Ok(HandlerResponse::text(200, n.to_string())),
        other => Err(DispatchError::ResponseBuild {
            strategy,
            found: other.kind(),
            expected: "expected a response or a value convertible to text",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_response_conversions() {
        let text = text_response("uri", HandlerOutput::from("hello")).unwrap();
        assert_eq!(text.status, 200);
        assert_eq!(text.content(), "hello");

        let number = text_response("uri", HandlerOutput::from(json!(42))).unwrap();
        assert_eq!(number.content(), "42");

        let empty = text_response("uri", HandlerOutput::Empty).unwrap();
        assert_eq!(empty.content(), "");

        let passthrough = text_response("uri", HandlerResponse::new(201).into()).unwrap();
        assert_eq!(passthrough.status, 201);
    }

    #[test]
    fn test_text_response_rejects_structured_values() {
        for output in [
            HandlerOutput::from(json!({"a": 1})),
            HandlerOutput::from(json!(true)),
            HandlerOutput::Opaque(Box::new(3u32)),
        ] {
            assert!(matches!(
                text_response("uri", output),
                Err(DispatchError::ResponseBuild { strategy: "uri", .. })
            ));
        }
    }

    #[test]
    fn test_builtin_strategy_from_str() {
        assert_eq!("restful".parse::<BuiltinStrategy>(), Ok(BuiltinStrategy::Restful));
        assert_eq!("Method-Argument".parse::<BuiltinStrategy>(), Ok(BuiltinStrategy::MethodArgument));
        assert_eq!("request_response".parse::<BuiltinStrategy>(), Ok(BuiltinStrategy::RequestResponse));
        assert!("soap".parse::<BuiltinStrategy>().is_err());
    }

    #[test]
    fn test_strategy_ref_names() {
        assert_eq!(StrategyRef::from(BuiltinStrategy::Uri).name(), "uri");
        assert_eq!(StrategyRef::fallback().name(), "request_response");
        assert_eq!(format!("{:?}", StrategyRef::from(RestfulStrategy)), "Policy(\"restful\")");
    }
}
