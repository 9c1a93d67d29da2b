//! Handlers, handler references and the values that flow in and out of them.
//!
//! A route's handler is either something callable right away ([`Handler`]) or
//! a string reference resolved at dispatch time by a
//! [`HandlerResolver`](crate::resolver::HandlerResolver):
//!
//! ```rust
//! use switchyard::handler::{Handler, HandlerRef, IntoHandler};
//!
//! let closure = Handler::new(|args| Ok(format!("{} args", args.len()).into()));
//! assert!(matches!(closure.into_handler().unwrap(), HandlerRef::Invocable(_)));
//!
//! let method = "UserController::show".into_handler().unwrap();
//! assert_eq!(method.to_string(), "UserController::show");
//! ```

use crate::error::RouteError;
use crate::router::ParamVec;
use crate::server::{HandlerRequest, HandlerResponse};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// What every handler returns.
pub type HandlerResult = anyhow::Result<HandlerOutput>;

/// One positional argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// A path parameter value
    Param(String),
    /// The current request
    Request(Arc<HandlerRequest>),
    /// A response the handler is expected to fill in and return
    Response(HandlerResponse),
}

/// How a resolved class method should receive its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Call with the positional list as-is
    Positional,
    /// Match the named parameters against the method's declared parameter names
    ByName,
}

/// Arguments computed by a strategy for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Arguments {
    positional: Vec<Argument>,
    named: ParamVec,
    binding: Binding,
}

impl Arguments {
    #[must_use]
    pub fn positional(positional: Vec<Argument>) -> Self {
        Self {
            positional,
            named: ParamVec::new(),
            binding: Binding::Positional,
        }
    }

    /// Named arguments to be bound against declared parameter names.
    #[must_use]
    pub fn by_name(named: ParamVec) -> Self {
        Self {
            positional: Vec::new(),
            named,
            binding: Binding::ByName,
        }
    }

    /// Make `named` available alongside the positional arguments.
    #[must_use]
    pub fn with_named(mut self, named: ParamVec) -> Self {
        self.named = named;
        self
    }

    #[must_use]
    pub fn binding(&self) -> Binding {
        self.binding
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Argument> {
        self.positional.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Argument> {
        self.positional.iter()
    }

    /// The positional path parameter at `index`.
    #[must_use]
    pub fn param(&self, index: usize) -> Option<&str> {
        match self.positional.get(index) {
            Some(Argument::Param(value)) => Some(value),
            _ => None,
        }
    }

    /// A named parameter.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&str> {
        self.named
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn named_params(&self) -> &ParamVec {
        &self.named
    }

    /// The first request argument.
    #[must_use]
    pub fn request(&self) -> Option<&Arc<HandlerRequest>> {
        self.positional.iter().find_map(|arg| match arg {
            Argument::Request(req) => Some(req),
            _ => None,
        })
    }

    /// Take the response argument out, consuming the arguments.
    #[must_use]
    pub fn into_response(self) -> Option<HandlerResponse> {
        self.positional.into_iter().find_map(|arg| match arg {
            Argument::Response(resp) => Some(resp),
            _ => None,
        })
    }

    pub(crate) fn bound(positional: Vec<Argument>, named: ParamVec) -> Self {
        Self {
            positional,
            named,
            binding: Binding::Positional,
        }
    }
}

/// Raw value returned by a handler, before a strategy turns it into a response.
pub enum HandlerOutput {
    /// A finished response
    Response(HandlerResponse),
    /// Plain text
    Text(String),
    /// Structured data
    Json(Value),
    /// Nothing
    Empty,
    /// A value with neither a text nor a JSON representation
    Opaque(Box<dyn Any + Send>),
}

impl HandlerOutput {
    /// Short name of the variant, used in error messages and logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerOutput::Response(_) => "a response",
            HandlerOutput::Text(_) => "text",
            HandlerOutput::Json(Value::Array(_)) => "a JSON array",
            HandlerOutput::Json(Value::Object(_)) => "a JSON object",
            HandlerOutput::Json(Value::Bool(_)) => "a JSON boolean",
            HandlerOutput::Json(_) => "a JSON scalar",
            HandlerOutput::Empty => "nothing",
            HandlerOutput::Opaque(_) => "an opaque value",
        }
    }
}

impl fmt::Debug for HandlerOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerOutput::Response(resp) => f.debug_tuple("Response").field(resp).finish(),
            HandlerOutput::Text(text) => f.debug_tuple("Text").field(text).finish(),
            HandlerOutput::Json(value) => f.debug_tuple("Json").field(value).finish(),
            HandlerOutput::Empty => f.write_str("Empty"),
            HandlerOutput::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl From<HandlerResponse> for HandlerOutput {
    fn from(resp: HandlerResponse) -> Self {
        HandlerOutput::Response(resp)
    }
}

impl From<String> for HandlerOutput {
    fn from(text: String) -> Self {
        HandlerOutput::Text(text)
    }
}

impl From<&str> for HandlerOutput {
    fn from(text: &str) -> Self {
        HandlerOutput::Text(text.to_string())
    }
}

impl From<Value> for HandlerOutput {
    fn from(value: Value) -> Self {
        HandlerOutput::Json(value)
    }
}

impl From<()> for HandlerOutput {
    fn from(_: ()) -> Self {
        HandlerOutput::Empty
    }
}

/// Anything with a single call capability.
pub trait Invocable: Send + Sync {
    fn invoke(&self, args: Arguments) -> HandlerResult;
}

impl<F> Invocable for F
where
    F: Fn(Arguments) -> HandlerResult + Send + Sync,
{
    fn invoke(&self, args: Arguments) -> HandlerResult {
        self(args)
    }
}

/// A shareable, directly invocable handler.
#[derive(Clone)]
pub struct Handler(Arc<dyn Invocable>);

impl Handler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Arguments) -> HandlerResult + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wrap an object implementing [`Invocable`].
    pub fn from_invocable<I: Invocable + 'static>(invocable: I) -> Self {
        Self(Arc::new(invocable))
    }

    pub fn call(&self, args: Arguments) -> HandlerResult {
        self.0.invoke(args)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

/// A route's handler as registered.
#[derive(Debug, Clone)]
pub enum HandlerRef {
    /// Callable as-is
    Invocable(Handler),
    /// `Class::method`, resolved through the container
    Method { class: String, method: String },
    /// A bare name, resolved through the container's free functions
    Function(String),
}

impl HandlerRef {
    /// Parse a string reference: `Class::method` or a bare identifier.
    pub fn parse(reference: &str) -> Result<Self, RouteError> {
        let invalid = |reason| RouteError::InvalidHandler {
            handler: reference.to_string(),
            reason,
        };

        if reference.is_empty() {
            return Err(invalid("handler reference is empty"));
        }
        if reference.chars().any(char::is_whitespace) {
            return Err(invalid("handler reference contains whitespace"));
        }

        match reference.split_once("::") {
            None => Ok(HandlerRef::Function(reference.to_string())),
            Some((class, method)) => {
                if class.is_empty() {
                    Err(invalid("missing class name before `::`"))
                } else if method.is_empty() {
                    Err(invalid("missing method name after `::`"))
                } else if method.contains("::") {
                    Err(invalid("expected exactly one `::` separator"))
                } else {
                    Ok(HandlerRef::Method {
                        class: class.to_string(),
                        method: method.to_string(),
                    })
                }
            }
        }
    }
}

impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerRef::Invocable(_) => f.write_str("<invocable>"),
            HandlerRef::Method { class, method } => write!(f, "{class}::{method}"),
            HandlerRef::Function(name) => f.write_str(name),
        }
    }
}

/// Values accepted as a route handler.
pub trait IntoHandler {
    fn into_handler(self) -> Result<HandlerRef, RouteError>;
}

impl IntoHandler for HandlerRef {
    fn into_handler(self) -> Result<HandlerRef, RouteError> {
        Ok(self)
    }
}

impl IntoHandler for Handler {
    fn into_handler(self) -> Result<HandlerRef, RouteError> {
        Ok(HandlerRef::Invocable(self))
    }
}

impl IntoHandler for &str {
    fn into_handler(self) -> Result<HandlerRef, RouteError> {
        HandlerRef::parse(self)
    }
}

impl IntoHandler for String {
    fn into_handler(self) -> Result<HandlerRef, RouteError> {
        HandlerRef::parse(&self)
    }
}
