// src/lib.rs
// =============================================================================
// follow-check: does account A follow account B?
//
// Modules:
// - api: the ApiClient seam, typed endpoint requests, the reqwest client
// - resolver: follower pagination, batched handle lookup, status matching
// - error: the error types both of them return
//
// The binary (src/main.rs) adds the command line, configuration and output
// on top of this.
// =============================================================================

pub mod api;
pub mod error;
pub mod resolver;

pub use api::{AccountRef, ApiClient, HttpApiClient};
pub use error::{ApiError, ClientError, ResolverError};
pub use resolver::{FollowingReport, FollowingStatusMap, FollowingStatusResolver};
