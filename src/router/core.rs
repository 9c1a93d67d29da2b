//! Router core module - route table and request matching.

use super::pattern::CompiledPattern;
use crate::handler::HandlerRef;
use crate::runtime_config::RuntimeConfig;
use crate::strategy::StrategyRef;
use http::Method;
use smallvec::SmallVec;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Maximum number of path/query parameters before heap allocation.
/// Most routes have ≤4 path params (e.g., /users/{id}/posts/{postId}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage, in pattern declaration order.
///
/// Param names use `Arc<str>`: they come from the compiled route table, so
/// handing them to a request is an atomic increment rather than a copy.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Methods a route can be registered for.
pub const SUPPORTED_METHODS: [Method; 7] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::HEAD,
    Method::OPTIONS,
];

/// A registered route: method, pattern, handler and optional strategy.
#[derive(Debug, Clone)]
pub struct Route {
    method: Method,
    pattern: String,
    compiled: CompiledPattern,
    handler: HandlerRef,
    strategy: Option<StrategyRef>,
}

impl Route {
    pub(crate) fn new(
        method: Method,
        pattern: String,
        compiled: CompiledPattern,
        handler: HandlerRef,
    ) -> Self {
        Self {
            method,
            pattern,
            compiled,
            handler,
            strategy: None,
        }
    }

    /// Use `strategy` for this route instead of the collection default.
    pub fn set_strategy(&mut self, strategy: impl Into<StrategyRef>) -> &mut Self {
        self.strategy = Some(strategy.into());
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The pattern as registered.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn compiled(&self) -> &CompiledPattern {
        &self.compiled
    }

    #[must_use]
    pub fn handler(&self) -> &HandlerRef {
        &self.handler
    }

    /// The route's own strategy, if one was set.
    #[must_use]
    pub fn strategy(&self) -> Option<&StrategyRef> {
        self.strategy.as_ref()
    }
}

/// Result of successfully matching a request path to a route
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched route (Arc to avoid cloning handler and strategy)
    pub route: Arc<Route>,
    /// Path parameters extracted from the URL (e.g., `{id}` → `{"id": "123"}`)
    pub path_params: ParamVec,
}

impl RouteMatch {
    /// Get a path parameter by name
    ///
    /// Uses "last write wins" semantics.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Outcome of matching a `(method, path)` pair.
#[derive(Debug, Clone)]
pub enum MatchResult {
    Found(RouteMatch),
    /// The path exists for other methods, listed in registration order
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

/// Immutable route table.
///
/// Static patterns are tried before patterns with placeholders; within each
/// group the first registered route wins. A `HEAD` request with no `HEAD`
/// route falls back to the `GET` route for the same path unless disabled in
/// [`RuntimeConfig`].
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Arc<Route>>,
    head_fallback: bool,
    slow_match: Duration,
}

impl Router {
    /// Build a router from registered routes.
    #[must_use]
    pub fn new(routes: Vec<Arc<Route>>, config: &RuntimeConfig) -> Self {
        let routes_summary: Vec<String> = routes
            .iter()
            .take(10)
            .map(|r| format!("{} {}", r.method, r.pattern))
            .collect();

        info!(
            routes_count = routes.len(),
            routes_summary = ?routes_summary,
            head_fallback = config.head_fallback,
            "Routing table loaded"
        );

        Self {
            routes,
            head_fallback: config.head_fallback,
            slow_match: Duration::from_micros(config.slow_match_us),
        }
    }

    /// Registered routes in registration order.
    #[must_use]
    pub fn routes(&self) -> &[Arc<Route>] {
        &self.routes
    }

    /// Match an HTTP request to a route.
    ///
    /// # Returns
    ///
    /// * `Found` - a route for this method matches
    /// * `MethodNotAllowed` - routes for other methods match the path
    /// * `NotFound` - nothing matches the path
    #[must_use]
    pub fn route(&self, method: &Method, path: &str) -> MatchResult {
        debug!(method = %method, path = %path, "Route match attempt");

        let match_start = Instant::now();

        let mut found = self.find(method, path);
        if found.is_none() && self.head_fallback && *method == Method::HEAD {
            found = self.find(&Method::GET, path);
        }

        let match_duration = match_start.elapsed();

        if let Some(route_match) = found {
            if match_duration > self.slow_match {
                warn!(
                    method = %method,
                    path = %path,
                    route_pattern = %route_match.route.pattern,
                    path_params = ?route_match.path_params,
                    duration_us = match_duration.as_micros(),
                    "Slow route matching detected"
                );
            } else {
                info!(
                    method = %method,
                    path = %path,
                    route_pattern = %route_match.route.pattern,
                    path_params = ?route_match.path_params,
                    duration_us = match_duration.as_micros(),
                    "Route matched"
                );
            }
            return MatchResult::Found(route_match);
        }

        let allowed = self.allowed(path);
        if allowed.is_empty() {
            warn!(method = %method, path = %path, "No route matched");
            MatchResult::NotFound
        } else {
            warn!(
                method = %method,
                path = %path,
                allowed = ?allowed,
                "Path matched but method is not allowed"
            );
            MatchResult::MethodNotAllowed(allowed)
        }
    }

    /// Methods registered for routes matching `path`, in registration order,
    /// without duplicates.
    #[must_use]
    pub fn allowed(&self, path: &str) -> Vec<Method> {
        let mut allowed: Vec<Method> = Vec::new();
        for route in &self.routes {
            if allowed.contains(&route.method) {
                continue;
            }
            if route.compiled.captures(path).is_some() {
                allowed.push(route.method.clone());
            }
        }
        allowed
    }

    fn find(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        let candidates = || self.routes.iter().filter(|r| r.method == *method);

        candidates()
            .filter(|r| r.compiled.is_static())
            .chain(candidates().filter(|r| !r.compiled.is_static()))
            .find_map(|route| {
                route.compiled.captures(path).map(|path_params| RouteMatch {
                    route: Arc::clone(route),
                    path_params,
                })
            })
    }
}
