use crate::error::DispatchError;
use crate::handler::{HandlerOutput, HandlerRef};
use crate::resolver::{BoundHandler, HandlerResolver};
use crate::router::{MatchResult, ParamVec, Route, Router};
use crate::server::{HandlerRequest, HandlerResponse};
use crate::strategy::{Strategy, StrategyRef};
use http::Method;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Result of a successful dispatch.
#[derive(Debug)]
pub enum Dispatched {
    /// A response built by the route's strategy
    Response(HandlerResponse),
    /// The untouched result of a [`CustomStrategy`](crate::strategy::CustomStrategy)
    Raw(HandlerOutput),
}

impl Dispatched {
    /// The response, if this is not a custom strategy's raw result.
    #[must_use]
    pub fn into_response(self) -> Option<HandlerResponse> {
        match self {
            Dispatched::Response(resp) => Some(resp),
            Dispatched::Raw(_) => None,
        }
    }

    #[must_use]
    pub fn is_raw(&self) -> bool {
        matches!(self, Dispatched::Raw(_))
    }
}

/// Where a dispatch ended up, before the strategy-independent mapping to
/// `Result<Dispatched, DispatchError>`.
enum Outcome {
    Response(HandlerResponse),
    Raw(HandlerOutput),
    NotFound,
    MethodNotAllowed(Vec<Method>),
    /// A handler failure the route's strategy declined to render
    DomainError(anyhow::Error),
    Fatal(DispatchError),
}

/// Immutable snapshot of a [`RouteCollection`](crate::RouteCollection).
///
/// Cheap to clone and safe to share between threads; every dispatch is an
/// independent, synchronous pass through match, resolve, invoke and build.
#[derive(Clone)]
pub struct Dispatcher {
    router: Arc<Router>,
    strategy: Option<StrategyRef>,
    resolver: Option<Arc<dyn HandlerResolver>>,
}

impl Dispatcher {
    pub(crate) fn new(
        router: Router,
        strategy: Option<StrategyRef>,
        resolver: Option<Arc<dyn HandlerResolver>>,
    ) -> Self {
        Self {
            router: Arc::new(router),
            strategy,
            resolver,
        }
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Dispatch a method and a request target (path plus optional query string).
    ///
    /// The method is matched case-insensitively. A token that is not a valid
    /// HTTP method matches no route, so the path decides between 404 and 405.
    ///
    /// # Errors
    ///
    /// Whatever the effective strategy does not turn into a response:
    /// [`DispatchError::NotFound`], [`DispatchError::MethodNotAllowed`],
    /// resolution and response-building failures, and unrecovered handler
    /// errors.
    pub fn dispatch(&self, method: &str, target: &str) -> Result<Dispatched, DispatchError> {
        match Method::from_bytes(method.to_ascii_uppercase().as_bytes()) {
            Ok(method) => self.dispatch_request(HandlerRequest::new(method, target)),
            Err(_) => {
                let path = target.split_once('?').map_or(target, |(path, _)| path);
                let allowed = self.router.allowed(path);
                warn!(method = %method, path = %path, "Invalid request method");
                let outcome = if allowed.is_empty() {
                    Outcome::NotFound
                } else {
                    Outcome::MethodNotAllowed(allowed)
                };
                self.settle(outcome)
            }
        }
    }

    /// Dispatch a prepared request, keeping its headers, body and request id.
    ///
    /// # Errors
    ///
    /// See [`dispatch`](Dispatcher::dispatch).
    pub fn dispatch_request(&self, mut request: HandlerRequest) -> Result<Dispatched, DispatchError> {
        let request_id = request.request_id;
        let outcome = match self.router.route(&request.method, &request.path) {
            MatchResult::Found(route_match) => {
                let route = route_match.route;
                let strategy = route
                    .strategy()
                    .or(self.strategy.as_ref())
                    .cloned()
                    .unwrap_or_else(StrategyRef::fallback);

                debug!(
                    request_id = %request_id,
                    route_pattern = %route.pattern(),
                    strategy = strategy.name(),
                    "Strategy selected"
                );

                request.path_params = route_match.path_params.clone();
                self.invoke(&route, &route_match.path_params, &strategy, request)
            }
            MatchResult::MethodNotAllowed(allowed) => Outcome::MethodNotAllowed(allowed),
            MatchResult::NotFound => Outcome::NotFound,
        };
        self.settle(outcome)
    }

    fn invoke(
        &self,
        route: &Route,
        path_params: &ParamVec,
        strategy: &StrategyRef,
        request: HandlerRequest,
    ) -> Outcome {
        let request_id = request.request_id;
        let start = Instant::now();

        let policy = match strategy {
            StrategyRef::Custom(custom) => {
                info!(
                    request_id = %request_id,
                    handler = %route.handler(),
                    strategy = custom.name(),
                    "Request dispatched to custom strategy"
                );
                return match custom.dispatch(route.handler(), path_params) {
                    Ok(output) => {
                        info!(
                            request_id = %request_id,
                            output = output.kind(),
                            latency_us = start.elapsed().as_micros() as u64,
                            "Custom strategy returned"
                        );
                        Outcome::Raw(output)
                    }
                    Err(err) => Outcome::DomainError(err),
                };
            }
            StrategyRef::Policy(policy) => policy,
        };

        let bound = match self.resolve(route.handler()) {
            Ok(bound) => bound,
            Err(err) => {
                error!(
                    request_id = %request_id,
                    handler = %route.handler(),
                    error = %err,
                    "Handler resolution failed"
                );
                return Outcome::Fatal(err);
            }
        };

        let request = Arc::new(request);
        let args = match bound.bind(policy.resolve_arguments(path_params, &request)) {
            Ok(args) => args,
            Err(err) => {
                error!(
                    request_id = %request_id,
                    handler = %bound.name(),
                    error = %err,
                    "Argument binding failed"
                );
                return Outcome::Fatal(err);
            }
        };

        info!(
            request_id = %request_id,
            handler = %bound.name(),
            method = %request.method,
            path = %request.path,
            args = args.len(),
            "Request dispatched to handler"
        );

        match bound.call(args) {
            Ok(output) => {
                let kind = output.kind();
                match policy.build_response(output) {
                    Ok(resp) => {
                        info!(
                            request_id = %request_id,
                            handler = %bound.name(),
                            status = resp.status,
                            latency_us = start.elapsed().as_micros() as u64,
                            "Handler response built"
                        );
                        Outcome::Response(resp)
                    }
                    Err(err) => {
                        error!(
                            request_id = %request_id,
                            handler = %bound.name(),
                            strategy = policy.name(),
                            output = kind,
                            "Response build failed"
                        );
                        Outcome::Fatal(err)
                    }
                }
            }
            Err(failure) => match policy.build_exception_response(failure) {
                Ok(resp) => {
                    info!(
                        request_id = %request_id,
                        handler = %bound.name(),
                        status = resp.status,
                        "Handler error rendered"
                    );
                    Outcome::Response(resp)
                }
                Err(failure) => {
                    warn!(
                        request_id = %request_id,
                        handler = %bound.name(),
                        error = %failure,
                        "Handler error propagated"
                    );
                    Outcome::DomainError(failure)
                }
            },
        }
    }

    fn resolve(&self, handler: &HandlerRef) -> Result<BoundHandler, DispatchError> {
        match (handler, &self.resolver) {
            (HandlerRef::Invocable(h), _) => Ok(BoundHandler::new(handler.to_string(), h.clone())),
            (_, Some(resolver)) => resolver.resolve(handler),
            (_, None) => Err(DispatchError::resolution(
                handler.to_string(),
                "no handler resolver is configured",
            )),
        }
    }

    /// Strategy rendering 404 and 405: the collection default, or the
    /// built-in fallback. A custom default renders nothing.
    fn collection_policy(&self) -> Option<Arc<dyn Strategy>> {
        match self.strategy.clone().unwrap_or_else(StrategyRef::fallback) {
            StrategyRef::Policy(policy) => Some(policy),
            StrategyRef::Custom(_) => None,
        }
    }

    fn settle(&self, outcome: Outcome) -> Result<Dispatched, DispatchError> {
        match outcome {
            Outcome::Response(resp) => Ok(Dispatched::Response(resp)),
            Outcome::Raw(output) => Ok(Dispatched::Raw(output)),
            Outcome::NotFound => self
                .collection_policy()
                .and_then(|policy| policy.build_not_found_response())
                .map(Dispatched::Response)
                .ok_or(DispatchError::NotFound),
            Outcome::MethodNotAllowed(allowed) => {
                match self
                    .collection_policy()
                    .and_then(|policy| policy.build_method_not_allowed_response(&allowed))
                {
                    Some(resp) => Ok(Dispatched::Response(resp)),
                    None => Err(DispatchError::MethodNotAllowed { allowed }),
                }
            }
            Outcome::DomainError(err) => Err(DispatchError::Handler(err)),
            Outcome::Fatal(err) => Err(err),
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.router.routes().len())
            .field("strategy", &self.strategy)
            .field("has_resolver", &self.resolver.is_some())
            .finish()
    }
}
