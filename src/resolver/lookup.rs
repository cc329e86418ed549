// src/resolver/lookup.rs
// =============================================================================
// Turns follower IDs into handles via users/lookup, 100 IDs per request.
//
// users/lookup quietly leaves out accounts it won't show us (protected,
// suspended, deleted). It doesn't error, the user just isn't in the answer.
// So after each batch we compare what we asked for against what came back;
// anything missing is "unresolved" and gets reported to the caller.
//
// Batches are independent, so they all go out concurrently. Each batch
// returns its own outcome and the outcomes are merged once every batch is
// done, so there's no shared state to lock. One failed batch fails the
// whole resolution.
// =============================================================================

use std::collections::HashSet;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use crate::api::{self, ApiClient, UsersLookupRequest, MAX_LOOKUP_BATCH};
use crate::error::{ResolverError, Result};

// Twitter's "No user matches for specified terms." error code. users/lookup
// answers 404 with it when none of the requested ids resolved.
pub const NO_USER_MATCHES: u32 = 17;

/// A follower ID with its handle, lowercased for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub id: String,
    pub handle: String,
}

/// Everything resolution learned about a list of IDs.
///
/// `names.len() + unresolved.len()` equals the number of IDs given.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub names: Vec<ResolvedName>,
    pub unresolved: Vec<String>,
}

impl Resolution {
    fn merge(&mut self, other: Resolution) {
        self.names.extend(other.names);
        self.unresolved.extend(other.unresolved);
    }

    // The resolved handles as a set, for membership checks
    pub fn handle_set(&self) -> HashSet<String> {
        self.names.iter().map(|name| name.handle.clone()).collect()
    }
}

// Resolves a single batch of at most MAX_LOOKUP_BATCH ids.
pub async fn lookup_batch(client: &dyn ApiClient, ids: &[String]) -> Result<Resolution> {
    let request = UsersLookupRequest::new(ids.to_vec())?;

    let users = match api::call(client, &request).await {
        Ok(users) => users,
        // 404 + code 17 is how users/lookup says "none of these ids matched".
        // Any other 404 (wrong base URL, retired endpoint) is a real failure.
        Err(ResolverError::ApiRequestFailed { source, .. })
            if source.status() == Some(404) && source.twitter_code() == Some(NO_USER_MATCHES) =>
        {
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    let requested: HashSet<&str> = request.ids().iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(users.len());

    for user in users {
        if requested.contains(user.id.as_str()) && seen.insert(user.id.clone()) {
            names.push(ResolvedName {
                handle: user.handle.to_lowercase(),
                id: user.id,
            });
        }
    }

    let unresolved: Vec<String> = request
        .ids()
        .iter()
        .filter(|id| !seen.contains(*id))
        .cloned()
        .collect();

    if !unresolved.is_empty() {
        debug!(
            requested = ids.len(),
            resolved = names.len(),
            unresolved = unresolved.len(),
            "users/lookup left some ids out"
        );
    }

    Ok(Resolution { names, unresolved })
}

// Resolves any number of ids, splitting them into batches of
// MAX_LOOKUP_BATCH.
//
// `concurrency` caps how many batches are in flight at once; None sends
// every batch immediately.
pub async fn resolve_ids(
    client: &dyn ApiClient,
    ids: &[String],
    concurrency: Option<usize>,
) -> Result<Resolution> {
    let batches: Vec<&[String]> = ids.chunks(MAX_LOOKUP_BATCH).collect();
    if batches.is_empty() {
        return Ok(Resolution::default());
    }

    let in_flight = concurrency.unwrap_or(batches.len()).max(1);
    debug!(ids = ids.len(), batches = batches.len(), in_flight, "resolving ids");

    // `buffered` keeps results in batch order, so slot i holds batch i
    let outcomes: Vec<Resolution> = stream::iter(batches)
        .map(|batch| lookup_batch(client, batch))
        .buffered(in_flight)
        .try_collect()
        .await?;

    let mut resolution = Resolution::default();
    for outcome in outcomes {
        resolution.merge(outcome);
    }
    Ok(resolution)
}
