//! Route registration.
//!
//! A [`RouteCollection`] is the mutable side of the crate: routes, matcher
//! aliases, the default strategy and the resolver are configured here, then
//! frozen into a [`Dispatcher`] snapshot. Later changes to the collection do
//! not affect snapshots already taken.

use crate::dispatcher::Dispatcher;
use crate::error::RouteError;
use crate::handler::IntoHandler;
use crate::resolver::HandlerResolver;
use crate::router::{compile, PatternMatchers, Route, Router, SUPPORTED_METHODS};
use crate::runtime_config::RuntimeConfig;
use crate::strategy::StrategyRef;
use http::Method;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Ordered set of routes plus everything a dispatcher needs to serve them.
#[derive(Default)]
pub struct RouteCollection {
    routes: Vec<Route>,
    matchers: PatternMatchers,
    strategy: Option<StrategyRef>,
    resolver: Option<Arc<dyn HandlerResolver>>,
    config: RuntimeConfig,
}

impl RouteCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve string handler references through `resolver`.
    #[must_use]
    pub fn with_resolver<R: HandlerResolver + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Apply runtime configuration. A configured default strategy replaces
    /// the current one.
    #[must_use]
    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        if let Some(strategy) = config.default_strategy {
            self.strategy = Some(strategy.into());
        }
        self.config = config;
        self
    }

    /// Register a route.
    ///
    /// Registering the same method and pattern again replaces the earlier
    /// route in place.
    ///
    /// # Errors
    ///
    /// - [`RouteError::UnsupportedMethod`] for methods outside GET, POST, PUT,
    ///   PATCH, DELETE, HEAD and OPTIONS
    /// - [`RouteError::InvalidPattern`] if the pattern does not compile
    /// - [`RouteError::InvalidHandler`] for a malformed handler reference
    pub fn add_route(
        &mut self,
        method: Method,
        pattern: &str,
        handler: impl IntoHandler,
    ) -> Result<&mut Route, RouteError> {
        if !SUPPORTED_METHODS.contains(&method) {
            return Err(RouteError::UnsupportedMethod(method));
        }
        let handler = handler.into_handler()?;
        let compiled = compile(pattern, &self.matchers)?;

        debug!(
            method = %method,
            pattern = %pattern,
            handler = %handler,
            params = ?compiled.param_names(),
            "Route registered"
        );

        let route = Route::new(method, pattern.to_string(), compiled, handler);
        let existing = self
            .routes
            .iter()
            .position(|r| r.method() == route.method() && r.pattern() == pattern);

        let idx = match existing {
            Some(idx) => {
                warn!(
                    method = %route.method(),
                    pattern = %pattern,
                    replaced_handler = %self.routes[idx].handler(),
                    "Route registered twice; replacing the earlier handler"
                );
                self.routes[idx] = route;
                idx
            }
            None => {
                self.routes.push(route);
                self.routes.len() - 1
            }
        };
        Ok(&mut self.routes[idx])
    }

    pub fn get(&mut self, pattern: &str, handler: impl IntoHandler) -> Result<&mut Route, RouteError> {
        self.add_route(Method::GET, pattern, handler)
    }

    pub fn post(&mut self, pattern: &str, handler: impl IntoHandler) -> Result<&mut Route, RouteError> {
        self.add_route(Method::POST, pattern, handler)
    }

    pub fn put(&mut self, pattern: &str, handler: impl IntoHandler) -> Result<&mut Route, RouteError> {
        self.add_route(Method::PUT, pattern, handler)
    }

    pub fn patch(&mut self, pattern: &str, handler: impl IntoHandler) -> Result<&mut Route, RouteError> {
        self.add_route(Method::PATCH, pattern, handler)
    }

    pub fn delete(&mut self, pattern: &str, handler: impl IntoHandler) -> Result<&mut Route, RouteError> {
        self.add_route(Method::DELETE, pattern, handler)
    }

    pub fn head(&mut self, pattern: &str, handler: impl IntoHandler) -> Result<&mut Route, RouteError> {
        self.add_route(Method::HEAD, pattern, handler)
    }

    pub fn options(&mut self, pattern: &str, handler: impl IntoHandler) -> Result<&mut Route, RouteError> {
        self.add_route(Method::OPTIONS, pattern, handler)
    }

    /// Strategy for routes that do not set their own.
    pub fn set_strategy(&mut self, strategy: impl Into<StrategyRef>) -> &mut Self {
        self.strategy = Some(strategy.into());
        self
    }

    #[must_use]
    pub fn strategy(&self) -> Option<&StrategyRef> {
        self.strategy.as_ref()
    }

    /// Register a placeholder alias: `{param:name}` becomes `{param:fragment}`
    /// in patterns registered afterwards.
    pub fn add_pattern_matcher(&mut self, name: &str, fragment: &str) -> Result<&mut Self, RouteError> {
        self.matchers.add(name, fragment)?;
        debug!(matcher = %name, fragment = %fragment, "Pattern matcher registered");
        Ok(self)
    }

    #[must_use]
    pub fn pattern_matchers(&self) -> &PatternMatchers {
        &self.matchers
    }

    /// Routes in registration order.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Freeze the current routes, default strategy and resolver.
    #[must_use]
    pub fn dispatcher(&self) -> Dispatcher {
        let routes = self.routes.iter().cloned().map(Arc::new).collect();
        Dispatcher::new(
            Router::new(routes, &self.config),
            self.strategy.clone(),
            self.resolver.clone(),
        )
    }
}

impl fmt::Debug for RouteCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteCollection")
            .field("routes", &self.routes)
            .field("matchers", &self.matchers)
            .field("strategy", &self.strategy)
            .field("has_resolver", &self.resolver.is_some())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::HandlerRef;
    use crate::strategy::{BuiltinStrategy, RestfulStrategy, UriStrategy};

    #[test]
    fn test_duplicate_route_replaces_in_place() {
        let mut collection = RouteCollection::new();
        collection.get("/a", "first").unwrap();
        collection.get("/b", "other").unwrap();
        collection.get("/a", "second").unwrap();

        assert_eq!(collection.routes().len(), 2);
        assert_eq!(collection.routes()[0].handler().to_string(), "second");
        assert_eq!(collection.routes()[1].pattern(), "/b");
    }

    #[test]
    fn test_same_pattern_different_methods_are_distinct() {
        let mut collection = RouteCollection::new();
        collection.get("/a", "h").unwrap();
        collection.post("/a", "h").unwrap();
        assert_eq!(collection.routes().len(), 2);
    }

    #[test]
    fn test_rejects_bad_registrations() {
        let mut collection = RouteCollection::new();
        assert!(matches!(
            collection.add_route(Method::TRACE, "/a", "h"),
            Err(RouteError::UnsupportedMethod(Method::TRACE))
        ));
        assert!(matches!(
            collection.get("", "h"),
            Err(RouteError::InvalidPattern { .. })
        ));
        assert!(matches!(
            collection.get("/a", "Class::"),
            Err(RouteError::InvalidHandler { .. })
        ));
        assert!(collection.routes().is_empty());
    }

    #[test]
    fn test_route_strategy_is_kept() {
        let mut collection = RouteCollection::new();
        collection.get("/a", "h").unwrap().set_strategy(UriStrategy);
        assert_eq!(
            collection.routes()[0].strategy().map(StrategyRef::name),
            Some("uri")
        );
        assert!(matches!(collection.routes()[0].handler(), HandlerRef::Function(_)));
    }

    #[test]
    fn test_matchers_apply_to_later_routes_only() {
        let mut collection = RouteCollection::new();
        let early = collection.get("/early/{v:hex}", "h").unwrap();
        assert_eq!(early.compiled().expanded(), "/early/{v:hex}");
        collection.add_pattern_matcher("hex", "[0-9a-f]+").unwrap();
        let route = collection.get("/late/{v:hex}", "h").unwrap();
        assert_eq!(route.compiled().expanded(), "/late/{v:[0-9a-f]+}");
    }

    #[test]
    fn test_config_default_strategy() {
        let collection = RouteCollection::new().with_config(RuntimeConfig {
            default_strategy: Some(BuiltinStrategy::Uri),
            ..RuntimeConfig::default()
        });
        assert_eq!(collection.strategy().map(StrategyRef::name), Some("uri"));

        let mut collection = RouteCollection::new().with_config(RuntimeConfig::default());
        assert!(collection.strategy().is_none());
        collection.set_strategy(RestfulStrategy);
        assert_eq!(collection.strategy().map(StrategyRef::name), Some("restful"));
    }
}
