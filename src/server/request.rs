use super::HeaderVec;
use crate::ids::RequestId;
use crate::router::ParamVec;
use http::Method;
use serde_json::Value;
use std::sync::Arc;

/// Request data handed to strategies and handlers.
///
/// Built by the dispatcher from `(method, path)` or supplied by the caller via
/// [`Dispatcher::dispatch_request`](crate::Dispatcher::dispatch_request) when
/// headers or a body are available. Path parameters are filled in after the
/// route has matched.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerRequest {
    /// Unique request ID for tracing and correlation
    pub request_id: RequestId,
    /// HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Request path without the query string
    pub path: String,
    /// Path parameters extracted from the URL (stack-allocated for ≤8 params)
    pub path_params: ParamVec,
    /// Query string parameters (stack-allocated for ≤8 params)
    pub query_params: ParamVec,
    /// HTTP headers (stack-allocated for ≤16 headers)
    pub headers: HeaderVec,
    /// Request body parsed as JSON (if present)
    pub body: Option<Value>,
}

impl HandlerRequest {
    /// Build a request from a method and a target such as `/users?limit=10`.
    ///
    /// The query string is split off the path and form-decoded.
    #[must_use]
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query_params) = match target.split_once('?') {
            Some((path, query)) => (path, parse_query_params(query)),
            None => (target, ParamVec::new()),
        };
        Self {
            request_id: RequestId::new(),
            method,
            path: path.to_string(),
            path_params: ParamVec::new(),
            query_params,
            headers: HeaderVec::new(),
            body: None,
        }
    }

    /// Add a header. An `x-request-id` header replaces the generated request id
    /// when it holds a valid ULID.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if name.eq_ignore_ascii_case("x-request-id") {
            self.request_id = RequestId::from_header_or_new(Some(&value));
        }
        self.headers.push((Arc::from(name), value));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Get a path parameter by name
    ///
    /// Uses "last write wins" semantics if a name appears more than once.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a query parameter by name
    ///
    /// Uses "last write wins" semantics: for `?limit=10&limit=20` this
    /// returns `20`.
    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Form-decode a query string (`a=1&b=two%20words`).
fn parse_query_params(query: &str) -> ParamVec {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (Arc::from(k.as_ref()), v.into_owned()))
        .collect()
}
