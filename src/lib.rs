//! # switchyard
//!
//! **switchyard** is a synchronous HTTP route dispatcher with pluggable response
//! strategies. It resolves a method and path to a registered handler, invokes
//! the handler with arguments derived from the request, and turns whatever the
//! handler returns into a response.
//!
//! ## Overview
//!
//! Route registration, path matching and response construction are kept
//! apart. A route says *what* handles a path; a [`Strategy`](strategy::Strategy)
//! says *how* that handler is called and how its output and failures are
//! turned into responses. The same handler can be served as a JSON endpoint,
//! a plain-text endpoint or a raw request/response function just by changing
//! the strategy.
//!
//! ## Architecture
//!
//! - **[`router`]** - Pattern compilation and `(method, path)` matching
//! - **[`collection`]** - Route registration and dispatcher snapshots
//! - **[`dispatcher`]** - The match, resolve, invoke and build pipeline
//! - **[`strategy`]** - Built-in and custom response strategies
//! - **[`resolver`]** - `Class::method` resolution through a dependency container
//! - **[`handler`]** - Handler references, arguments and outputs
//! - **[`server`]** - Request and response values
//! - **[`http_error`]** - Domain errors with an HTTP status
//! - **[`runtime_config`]** / **[`logging`]** - Environment configuration and tracing setup
//!
//! ### Dispatch Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Dispatcher
//!     participant Router
//!     participant Strategy
//!     participant Resolver
//!     participant Handler
//!
//!     Caller->>Dispatcher: dispatch("GET", "/users/7")
//!     Dispatcher->>Router: route(GET, "/users/7")
//!     Router-->>Dispatcher: Found(route, {id: "7"})
//!     Dispatcher->>Resolver: resolve("UserController::show")
//!     Resolver-->>Dispatcher: BoundHandler
//!     Dispatcher->>Strategy: resolve_arguments(params, request)
//!     Dispatcher->>Handler: call(arguments)
//!     Handler-->>Dispatcher: HandlerOutput
//!     Dispatcher->>Strategy: build_response(output)
//!     Strategy-->>Caller: HandlerResponse
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use switchyard::strategy::RestfulStrategy;
//! use switchyard::{Container, Handler, HttpError, RouteCollection, Service};
//!
//! let mut container = Container::new();
//! container.share(
//!     "PetController",
//!     Service::new().method(
//!         "show",
//!         Handler::new(|args| {
//!             let id = args.named("id").unwrap_or_default();
//!             if id == "0" {
//!                 return Err(HttpError::not_found().with_message("No such pet").into());
//!             }
//!             Ok(json!({ "id": id, "name": "Rex" }).into())
//!         }),
//!     ),
//! );
//!
//! let mut routes = RouteCollection::new().with_resolver(container);
//! routes.set_strategy(RestfulStrategy);
//! routes.get("/pets/{id:number}", "PetController::show").unwrap();
//!
//! let dispatcher = routes.dispatcher();
//!
//! let ok = dispatcher.dispatch("GET", "/pets/7").unwrap().into_response().unwrap();
//! assert_eq!(ok.content(), r#"{"id":"7","name":"Rex"}"#);
//!
//! let missing = dispatcher.dispatch("GET", "/pets/0").unwrap().into_response().unwrap();
//! assert_eq!(missing.status, 404);
//! assert_eq!(missing.content(), r#"{"status_code":404,"message":"No such pet"}"#);
//!
//! let not_allowed = dispatcher.dispatch("POST", "/pets/7").unwrap().into_response().unwrap();
//! assert_eq!(not_allowed.get_header("Allow"), Some("GET"));
//! ```
//!
//! ## Logging
//!
//! Every stage emits `tracing` events (`Route matched`, `Request dispatched
//! to handler`, `Handler response built`, ...) tagged with the request id.
//! Install a subscriber with [`logging::init_tracing`] or bring your own.

pub mod collection;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod http_error;
pub mod ids;
pub mod logging;
pub mod resolver;
pub mod router;
pub mod runtime_config;
pub mod server;
pub mod strategy;

pub use collection::RouteCollection;
pub use dispatcher::{Dispatched, Dispatcher};
pub use error::{DispatchError, RouteError};
pub use handler::{Argument, Arguments, Handler, HandlerOutput, HandlerRef, HandlerResult, IntoHandler};
pub use http_error::HttpError;
pub use resolver::{BoundHandler, Container, HandlerResolver, Service};
pub use runtime_config::RuntimeConfig;
pub use server::{HandlerRequest, HandlerResponse};
pub use strategy::{CustomStrategy, Strategy, StrategyRef};
