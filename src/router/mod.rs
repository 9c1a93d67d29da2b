//! # Router Module
//!
//! Path matching for the dispatcher. Route patterns are compiled to regexes
//! once, at registration time, and matched against incoming paths on every
//! dispatch.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling patterns with `{name}`, `{name:regex}` and `{name:alias}` placeholders
//! - Matching a `(method, path)` pair to exactly one route
//! - Reporting which methods a path does support when the requested one is missing
//! - Extracting path parameters in declaration order
//!
//! ## Example
//!
//! ```rust
//! use switchyard::router::{compile, PatternMatchers};
//!
//! let compiled = compile("/users/{id:number}", &PatternMatchers::default()).unwrap();
//! let params = compiled.captures("/users/42").unwrap();
//! assert_eq!(params[0].1, "42");
//! assert!(compiled.captures("/users/abc").is_none());
//! ```
//!
//! ## Matching rules
//!
//! - Static patterns win over patterns with placeholders
//! - Otherwise the first registered route for the method wins
//! - `HEAD` falls back to `GET` (configurable)
//! - Allowed methods for a 405 are reported in registration order

mod core;
mod pattern;
#[cfg(test)]
mod tests;

pub use core::{MatchResult, ParamVec, Route, RouteMatch, Router, MAX_INLINE_PARAMS, SUPPORTED_METHODS};
pub use pattern::{compile, CompiledPattern, PatternMatchers, DEFAULT_PLACEHOLDER_REGEX};
