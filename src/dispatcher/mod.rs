//! # Dispatcher Module
//!
//! Runs one request through the route table and the route's strategy.
//!
//! ## Request Flow
//!
//! 1. The router matches `(method, path)`: a route, a 405 with the allowed
//!    methods, or a 404
//! 2. The strategy is chosen: the route's own, else the collection default,
//!    else [`RequestResponseStrategy`](crate::strategy::RequestResponseStrategy)
//! 3. String handler references are resolved through the collection's
//!    [`HandlerResolver`](crate::resolver::HandlerResolver)
//! 4. The strategy computes the arguments and the handler is invoked
//! 5. The strategy turns the handler's output into a response
//!
//! A [`CustomStrategy`](crate::strategy::CustomStrategy) replaces steps 3 to 5
//! and its result is returned as [`Dispatched::Raw`].
//!
//! ## Error Handling
//!
//! - 404 and 405 are rendered by the collection-level strategy, never a
//!   route's, since no route was selected
//! - Handler errors go to the route strategy's exception hook; errors it
//!   declines come back as [`DispatchError::Handler`](crate::DispatchError::Handler)
//! - Resolution and response-building failures are always returned as errors
//!
//! ```rust
//! use switchyard::{Handler, RouteCollection, DispatchError};
//! use switchyard::strategy::UriStrategy;
//!
//! let mut routes = RouteCollection::new();
//! routes.set_strategy(UriStrategy);
//! routes
//!     .get("/hello/{name}", Handler::new(|args| {
//!         Ok(format!("hello {}", args.param(0).unwrap_or("")).into())
//!     }))
//!     .unwrap();
//!
//! let dispatcher = routes.dispatcher();
//! let resp = dispatcher.dispatch("GET", "/hello/world").unwrap().into_response().unwrap();
//! assert_eq!(resp.content(), "hello world");
//! assert!(matches!(dispatcher.dispatch("GET", "/nope"), Err(DispatchError::NotFound)));
//! ```

mod core;

pub use core::{Dispatched, Dispatcher};
