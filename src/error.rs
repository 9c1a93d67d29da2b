//! Error types for route registration and dispatch.
//!
//! Registration problems surface immediately as [`RouteError`] while the
//! collection is being built. Everything that can go wrong while serving a
//! request is a [`DispatchError`]; strategies decide which of those are turned
//! into responses and which propagate to the caller.

use crate::http_error::HttpError;
use http::Method;
use thiserror::Error;

/// Errors raised while registering routes on a [`RouteCollection`](crate::RouteCollection).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The handler reference is neither invocable nor a well-formed
    /// `Class::method` / function name string.
    #[error("invalid handler `{handler}`: {reason}")]
    InvalidHandler {
        /// The rejected handler reference
        handler: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// The path pattern could not be compiled.
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The raw pattern as registered
        pattern: String,
        /// Compiler diagnostic
        reason: String,
    },

    /// Only GET, POST, PUT, PATCH, DELETE, HEAD and OPTIONS can be registered.
    #[error("unsupported route method `{0}`")]
    UnsupportedMethod(Method),
}

/// Errors raised by [`Dispatcher::dispatch`](crate::Dispatcher::dispatch).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No route matches the request path.
    #[error("Not Found")]
    NotFound,

    /// The path matches, but not for the requested method.
    #[error("Method Not Allowed")]
    MethodNotAllowed {
        /// Methods registered for the path, in registration order
        allowed: Vec<Method>,
    },

    /// A class/method or function reference could not be resolved.
    #[error("unable to resolve handler `{handler}`: {reason}")]
    HandlerResolution {
        /// The handler reference as registered
        handler: String,
        /// What was missing
        reason: String,
    },

    /// The handler returned a value the active strategy cannot turn into a response.
    #[error("{strategy} strategy cannot build a response from {found}: {expected}")]
    ResponseBuild {
        /// Name of the strategy that rejected the value
        strategy: &'static str,
        /// Kind of value the handler returned
        found: &'static str,
        /// What the strategy accepts
        expected: &'static str,
    },

    /// The handler itself failed and the strategy did not recover the error.
    #[error(transparent)]
    Handler(anyhow::Error),
}

impl DispatchError {
    /// HTTP status a higher layer should use when rendering this error.
    ///
    /// Handler errors carrying an [`HttpError`] keep their own status; every
    /// other unrecovered failure is a 500.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            DispatchError::NotFound => 404,
            DispatchError::MethodNotAllowed { .. } => 405,
            DispatchError::Handler(err) => err
                .downcast_ref::<HttpError>()
                .map_or(500, HttpError::status),
            DispatchError::HandlerResolution { .. } | DispatchError::ResponseBuild { .. } => 500,
        }
    }

    /// The domain error raised by the handler, if that is what this is.
    #[must_use]
    pub fn http_error(&self) -> Option<&HttpError> {
        match self {
            DispatchError::Handler(err) => err.downcast_ref::<HttpError>(),
            _ => None,
        }
    }

    pub(crate) fn resolution(handler: impl Into<String>, reason: impl Into<String>) -> Self {
        DispatchError::HandlerResolution {
            handler: handler.into(),
            reason: reason.into(),
        }
    }
}
