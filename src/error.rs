// src/error.rs
// =============================================================================
// Error types for the follower resolver.
//
// Two layers:
// - ApiError: what went wrong talking to the API (transport, HTTP status,
//   rate limit, undecodable body)
// - ResolverError: what the caller of the resolver sees. Every ApiError is
//   wrapped as ApiRequestFailed together with the endpoint that failed.
//
// Unresolvable accounts are NOT an error here; they're reported alongside
// the result (see resolver::lookup).
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Network failure, timeout, TLS error, etc.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// HTTP 429 - the app's request window is used up
    #[error("rate limit exceeded{}", reset_suffix(.reset_at))]
    RateLimited {
        /// Epoch seconds at which the window resets, if the API said so
        reset_at: Option<u64>,
    },

    /// Any other non-2xx response. `code` is the Twitter error code from
    /// the body's `errors` array, when there was one.
    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        code: Option<u32>,
        message: String,
    },

    /// The endpoint path couldn't be joined onto the base URL
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The body wasn't the JSON shape we expected
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    // Twitter's own error code (e.g. 17 "No user matches", 34 "page does not exist")
    pub fn twitter_code(&self) -> Option<u32> {
        match self {
            ApiError::Status { code, .. } => *code,
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::RateLimited { .. } => Some(429),
            _ => None,
        }
    }
}

fn reset_suffix(reset_at: &Option<u64>) -> String {
    match reset_at {
        Some(epoch) => format!(" (window resets at epoch {})", epoch),
        None => String::new(),
    }
}

/// Why an HttpApiClient couldn't be built.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("could not build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum ResolverError {
    /// Caller passed something we refuse to send (bad identifier,
    /// oversized lookup batch). Raised before any network call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A request to `endpoint` failed. Not retried.
    #[error("request to {endpoint} failed: {source}")]
    ApiRequestFailed {
        endpoint: &'static str,
        #[source]
        source: ApiError,
    },
}

impl ResolverError {
    pub fn api(endpoint: &'static str, source: ApiError) -> Self {
        ResolverError::ApiRequestFailed { endpoint, source }
    }
}

pub type Result<T> = std::result::Result<T, ResolverError>;
