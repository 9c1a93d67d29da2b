use super::HeaderVec;
use serde_json::Value;
use std::sync::Arc;

/// Response produced by a strategy or returned directly by a handler.
///
/// The body is kept as the final serialized text so that two dispatches of the
/// same request produce byte-identical output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerResponse {
    /// HTTP status code (200, 404, 500, etc.)
    pub status: u16,
    /// HTTP response headers (stack-allocated for ≤16 headers)
    pub headers: HeaderVec,
    body: String,
}

impl Default for HandlerResponse {
    fn default() -> Self {
        Self::new(200)
    }
}

impl HandlerResponse {
    /// An empty response with the given status and no headers.
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HeaderVec::new(),
            body: String::new(),
        }
    }

    /// A `text/plain` response.
    #[must_use]
    pub fn text(status: u16, content: impl Into<String>) -> Self {
        let mut response = Self::new(status);
        response.set_header("content-type", "text/plain; charset=utf-8".to_string());
        response.body = content.into();
        response
    }

    /// An `application/json` response. Object keys keep their insertion order.
    #[must_use]
    pub fn json(status: u16, body: &Value) -> Self {
        let mut response = Self::new(status);
        response.set_header("content-type", "application/json".to_string());
        response.body = body.to_string();
        response
    }

    /// 200 JSON response.
    #[must_use]
    pub fn ok(body: &Value) -> Self {
        Self::json(200, body)
    }

    /// 201 JSON response, optionally pointing at the new resource.
    #[must_use]
    pub fn created(body: &Value, location: Option<&str>) -> Self {
        let mut response = Self::json(201, body);
        if let Some(location) = location {
            response.set_header("location", location.to_string());
        }
        response
    }

    /// 202 JSON response.
    #[must_use]
    pub fn accepted(body: &Value) -> Self {
        Self::json(202, body)
    }

    /// 204 response. No body is sent.
    #[must_use]
    pub fn no_content() -> Self {
        Self::new(204)
    }

    /// 205 response. No body is sent.
    #[must_use]
    pub fn reset_content() -> Self {
        Self::new(205)
    }

    /// 206 JSON response with a `Content-Range` header.
    #[must_use]
    pub fn partial_content(body: &Value, content_range: &str) -> Self {
        let mut response = Self::json(206, body);
        response.set_header("content-range", content_range.to_string());
        response
    }

    /// Replace the body, keeping status and headers.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.body = content.into();
        self
    }

    /// The serialized body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.body
    }

    /// Parse the body back into JSON, if it is JSON.
    #[must_use]
    pub fn json_body(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// Get a header by name
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or update a header
    pub fn set_header(&mut self, name: &str, value: String) {
        // Remove existing header with same name (case-insensitive)
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_presets_status_codes() {
        assert_eq!(HandlerResponse::ok(&json!({})).status, 200);
        assert_eq!(HandlerResponse::created(&json!({}), None).status, 201);
        assert_eq!(HandlerResponse::accepted(&json!({})).status, 202);
        assert_eq!(HandlerResponse::no_content().status, 204);
        assert_eq!(HandlerResponse::reset_content().status, 205);
        assert_eq!(HandlerResponse::partial_content(&json!([]), "items 0-9/20").status, 206);
    }

    #[test]
    fn test_json_keeps_key_order() {
        let resp = HandlerResponse::json(404, &json!({"status_code": 404, "message": "Not Found"}));
        assert_eq!(resp.content(), r#"{"status_code":404,"message":"Not Found"}"#);
        assert_eq!(resp.get_header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_created_location_header() {
        let resp = HandlerResponse::created(&json!({"id": 7}), Some("/pets/7"));
        assert_eq!(resp.get_header("location"), Some("/pets/7"));
        assert_eq!(resp.json_body(), Some(json!({"id": 7})));
    }

    #[test]
    fn test_set_header_replaces() {
        let mut resp = HandlerResponse::new(200);
        resp.set_header("X-Test", "a".to_string());
        resp.set_header("x-test", "b".to_string());
        assert_eq!(resp.headers.len(), 1);
        assert_eq!(resp.get_header("X-TEST"), Some("b"));
    }
}
