// src/resolver/status.rs
// =============================================================================
// FollowingStatusResolver: answers "which of these accounts follow X?"
//
// Steps:
// 1. collect every follower ID of X           (followers.rs)
// 2. resolve those IDs to lowercased handles  (lookup.rs)
// 3. check each candidate, case-insensitively, against that handle set
//
// Followers whose profile couldn't be looked up can't be confirmed, so a
// candidate who is one of them comes out as "not following". Those IDs are
// logged and returned in the report so the caller knows the answer is
// conservative.
// =============================================================================

use std::collections::{HashMap, HashSet};

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::info;

use super::followers::collect_follower_ids;
use super::lookup::{resolve_ids, Resolution};
use crate::api::{AccountRef, ApiClient};
use crate::error::{ResolverError, Result};

/// Candidate handle (as the caller spelled it) -> follows or not.
///
/// Keeps the check-list's order. If a handle appears twice only the first
/// spelling is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowingStatusMap {
    entries: Vec<(String, bool)>,
    // handle -> position in `entries`
    index: HashMap<String, usize>,
}

impl FollowingStatusMap {
    fn contains(&self, handle: &str) -> bool {
        self.index.contains_key(handle)
    }

    // Caller makes sure `handle` isn't already present
    fn push(&mut self, handle: &str, following: bool) {
        self.index.insert(handle.to_string(), self.entries.len());
        self.entries.push((handle.to_string(), following));
    }

    pub fn get(&self, handle: &str) -> Option<bool> {
        self.index.get(handle).map(|&i| self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(key, following)| (key.as_str(), *following))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn following_count(&self) -> usize {
        self.entries.iter().filter(|(_, following)| *following).count()
    }

    pub fn all_following(&self) -> bool {
        self.entries.iter().all(|(_, following)| *following)
    }
}

// Serialized as a plain JSON object: {"alice": true, "Bob": false}
impl Serialize for FollowingStatusMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (handle, following) in &self.entries {
            map.serialize_entry(handle, following)?;
        }
        map.end()
    }
}

/// Everything a run found out, for callers that want more than the map.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FollowingReport {
    pub followed: String,
    pub follower_count: usize,
    pub statuses: FollowingStatusMap,
    /// Follower IDs users/lookup wouldn't resolve (protected, suspended, deleted)
    pub unresolved_ids: Vec<String>,
}

// Matches the check-list against a set of lowercased handles.
//
// Pure and idempotent: same inputs, same map.
pub fn match_following<S: AsRef<str>>(check_list: &[S], handles: &HashSet<String>) -> FollowingStatusMap {
    let mut map = FollowingStatusMap {
        entries: Vec::with_capacity(check_list.len()),
        index: HashMap::with_capacity(check_list.len()),
    };

    for candidate in check_list {
        let candidate = candidate.as_ref();
        if map.contains(candidate) {
            continue;
        }
        let normalized = candidate.trim().trim_start_matches('@').to_lowercase();
        map.push(candidate, handles.contains(&normalized));
    }

    map
}

pub struct FollowingStatusResolver<'a> {
    client: &'a dyn ApiClient,
    lookup_concurrency: Option<usize>,
}

impl<'a> FollowingStatusResolver<'a> {
    pub fn new(client: &'a dyn ApiClient) -> Self {
        FollowingStatusResolver {
            client,
            lookup_concurrency: None,
        }
    }

    // Caps the number of users/lookup requests in flight at once
    pub fn with_lookup_concurrency(mut self, limit: Option<usize>) -> Self {
        self.lookup_concurrency = limit;
        self
    }

    pub async fn follower_ids(&self, followed: &AccountRef) -> Result<Vec<String>> {
        collect_follower_ids(self.client, followed).await
    }

    pub async fn resolve(&self, ids: &[String]) -> Result<Resolution> {
        resolve_ids(self.client, ids, self.lookup_concurrency).await
    }

    // Which of `check_list` follow `followed`.
    //
    // `followed` is a handle string or an AccountRef. A bad handle fails
    // with InvalidArgument before any request is sent. Fails on the first
    // API error; there is no partial answer.
    pub async fn following_status<A, S>(&self, followed: A, check_list: &[S]) -> Result<FollowingStatusMap>
    where
        A: TryInto<AccountRef, Error = ResolverError>,
        S: AsRef<str>,
    {
        let followed = followed.try_into()?;
        let report = self.report(&followed, check_list).await?;
        Ok(report.statuses)
    }

    pub async fn report<S: AsRef<str>>(&self, followed: &AccountRef, check_list: &[S]) -> Result<FollowingReport> {
        let ids = self.follower_ids(followed).await?;
        let resolution = self.resolve(&ids).await?;

        if !resolution.unresolved.is_empty() {
            info!(
                followed = %followed,
                unresolved = ?resolution.unresolved,
                "{} follower account(s) could be protected/suspended and their profile couldn't be retrieved; \
                 they are reported as not following",
                resolution.unresolved.len()
            );
        }

        let statuses = match_following(check_list, &resolution.handle_set());

        Ok(FollowingReport {
            followed: followed.to_string(),
            follower_count: ids.len(),
            statuses,
            unresolved_ids: resolution.unresolved,
        })
    }
}
