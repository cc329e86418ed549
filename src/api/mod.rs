// src/api/mod.rs
// =============================================================================
// The API collaborator the resolver talks to.
//
// Submodules:
// - endpoints: typed request structs for the two endpoints we call, and the
//   response shapes they decode into
// - http: the real client, built on reqwest
// - fake: an in-memory client for tests
//
// The resolver only ever sees `dyn ApiClient`, so it never touches reqwest
// directly. Anything that can answer a GET with JSON will do.
// =============================================================================

mod endpoints;
mod http;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;

use crate::error::{ApiError, ResolverError};

pub use endpoints::{
    AccountRef, Endpoint, FollowerIdPage, FollowerIdsRequest, LookupUser, UsersLookupRequest,
    FOLLOWER_IDS_PAGE_SIZE, MAX_LOOKUP_BATCH, START_CURSOR,
};
pub use http::HttpApiClient;

// Query parameters in the order they'll be sent
pub type Query = Vec<(&'static str, String)>;

// An authenticated client that can GET an endpoint and hand back its JSON body.
//
// `endpoint` is the bare API path, e.g. "followers/ids".
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn get(&self, endpoint: &str, query: Query) -> Result<serde_json::Value, ApiError>;
}

// Sends a typed request and decodes its typed response.
//
// Any failure (including a body that doesn't decode) is reported as
// ApiRequestFailed for that endpoint.
pub async fn call<E: Endpoint>(client: &dyn ApiClient, request: &E) -> Result<E::Response, ResolverError> {
    let body = client
        .get(E::PATH, request.query())
        .await
        .map_err(|e| ResolverError::api(E::PATH, e))?;

    serde_json::from_value(body).map_err(|e| ResolverError::api(E::PATH, ApiError::Decode(e)))
}
