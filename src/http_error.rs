//! Domain-level HTTP errors.
//!
//! Handlers return these inside `anyhow::Error` to signal a recoverable,
//! user-visible failure (a conflict, a validation problem, ...). Strategies
//! that understand them ([`RestfulStrategy`](crate::strategy::RestfulStrategy))
//! render `{"status_code": .., "message": ..}` with the error's status and
//! headers; the others let the error propagate to the caller.
//!
//! ```rust
//! use switchyard::HttpError;
//!
//! let err = HttpError::conflict();
//! assert_eq!(err.status(), 409);
//! assert_eq!(err.message(), "Conflict");
//! ```

use crate::server::{HandlerResponse, HeaderVec};
use http::Method;
use serde_json::json;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::warn;

/// Statuses a domain error may carry.
pub const STATUS_RANGE: RangeInclusive<u16> = 300..=599;

/// An HTTP error with a 3xx-5xx status, a message and optional headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    status: u16,
    message: String,
    headers: HeaderVec,
}

impl HttpError {
    /// Create an error with the given status and message.
    ///
    /// A status outside 300..=599 is replaced by 500; use
    /// [`try_new`](HttpError::try_new) to reject it instead.
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        let status = if STATUS_RANGE.contains(&status) {
            status
        } else {
            warn!(status, message = %message, "HTTP error status out of range; using 500");
            500
        };
        Self {
            status,
            message,
            headers: HeaderVec::new(),
        }
    }

    /// Create an error, or `None` if `status` is not a 3xx-5xx code.
    #[must_use]
    pub fn try_new(status: u16, message: impl Into<String>) -> Option<Self> {
        STATUS_RANGE.contains(&status).then(|| Self {
            status,
            message: message.into(),
            headers: HeaderVec::new(),
        })
    }

    /// Attach a header to the rendered response.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value.into()));
        self
    }

    /// Replace the canonical message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderVec {
        &self.headers
    }

    /// Render as a JSON response: `{"status_code": .., "message": ..}`.
    #[must_use]
    pub fn to_response(&self) -> HandlerResponse {
        let mut response = HandlerResponse::json(
            self.status,
            &json!({ "status_code": self.status, "message": self.message }),
        );
        for (name, value) in &self.headers {
            response.set_header(name, value.clone());
        }
        response
    }

    pub fn bad_request() -> Self {
        Self::new(400, "Bad Request")
    }

    pub fn unauthorized() -> Self {
        Self::new(401, "Unauthorized")
    }

    pub fn forbidden() -> Self {
        Self::new(403, "Forbidden")
    }

    pub fn not_found() -> Self {
        Self::new(404, "Not Found")
    }

    /// 405 with an `Allow` header listing `allowed` in the given order.
    pub fn method_not_allowed(allowed: &[Method]) -> Self {
        Self::new(405, "Method Not Allowed").with_header("Allow", join_methods(allowed))
    }

    pub fn not_acceptable() -> Self {
        Self::new(406, "Not Acceptable")
    }

    pub fn conflict() -> Self {
        Self::new(409, "Conflict")
    }

    pub fn gone() -> Self {
        Self::new(410, "Gone")
    }

    pub fn length_required() -> Self {
        Self::new(411, "Length Required")
    }

    pub fn precondition_failed() -> Self {
        Self::new(412, "Precondition Failed")
    }

    pub fn unsupported_media() -> Self {
        Self::new(415, "Unsupported Media Type")
    }

    pub fn expectation_failed() -> Self {
        Self::new(417, "Expectation Failed")
    }

    pub fn im_a_teapot() -> Self {
        Self::new(418, "I'm a teapot")
    }

    pub fn unprocessable_entity() -> Self {
        Self::new(422, "Unprocessable Entity")
    }

    pub fn precondition_required() -> Self {
        Self::new(428, "Precondition Required")
    }

    pub fn too_many_requests() -> Self {
        Self::new(429, "Too Many Requests")
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.message)
    }
}

impl std::error::Error for HttpError {}

/// `POST, PUT, DELETE` style list used for `Allow` headers.
pub(crate) fn join_methods(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
