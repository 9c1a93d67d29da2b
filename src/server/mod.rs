//! Request and response values passed through the dispatch pipeline.
//!
//! These are deliberately small: the dispatcher only needs the method, path,
//! extracted parameters and a handful of headers on the way in, and a status,
//! headers and a body on the way out. Wiring them to a real HTTP server is left
//! to the embedding application.

pub mod request;
pub mod response;

use smallvec::SmallVec;
use std::sync::Arc;

pub use request::HandlerRequest;
pub use response::HandlerResponse;

/// Maximum inline headers before heap allocation.
/// Most requests have ≤16 headers.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage.
///
/// Header names use `Arc<str>`: they repeat across requests (`content-type`,
/// `allow`, ...) and cloning an `Arc` is a single atomic increment.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;
