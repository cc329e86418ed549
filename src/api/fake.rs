// src/api/fake.rs
// =============================================================================
// A scripted, in-memory ApiClient for tests.
//
// It simulates a followed account with a fixed follower list:
// - followers/ids pages through the list 5000 at a time, using the index
//   of the next page as its cursor
// - users/lookup answers with the handles it knows and silently drops
//   "hidden" IDs, the way the real API drops protected/suspended accounts
//
// Every call is recorded so tests can assert on how many requests were made
// and with which parameters. Failures can be injected per page. The fake also
// tracks the most users/lookup calls it ever had in flight at once.
// =============================================================================

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{ApiClient, Query};
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub endpoint: String,
    pub query: Query,
}

impl RecordedCall {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Default)]
pub struct FakeTwitter {
    follower_ids: Vec<String>,
    handles: HashMap<String, String>,
    hidden: HashSet<String>,
    fail_on_page: Option<usize>,
    fail_lookup_containing: Option<String>,
    lookup_missing: bool,
    calls: Mutex<Vec<RecordedCall>>,
    lookups_in_flight: AtomicUsize,
    peak_lookups_in_flight: AtomicUsize,
}

impl FakeTwitter {
    // `followers` are (id, handle) pairs in follower-list order
    pub fn with_followers(followers: &[(&str, &str)]) -> Self {
        FakeTwitter {
            follower_ids: followers.iter().map(|(id, _)| id.to_string()).collect(),
            handles: followers
                .iter()
                .map(|(id, handle)| (id.to_string(), handle.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    // `count` followers with ids "1".."count" and handles "user1".."userN"
    pub fn with_follower_count(count: usize) -> Self {
        let followers: Vec<(String, String)> = (1..=count)
            .map(|i| (i.to_string(), format!("user{}", i)))
            .collect();
        FakeTwitter {
            follower_ids: followers.iter().map(|(id, _)| id.clone()).collect(),
            handles: followers.into_iter().collect(),
            ..Default::default()
        }
    }

    // users/lookup will leave this id out of its answers
    pub fn hide(mut self, id: &str) -> Self {
        self.hidden.insert(id.to_string());
        self
    }

    // followers/ids fails with HTTP 503 on this page (1-based)
    pub fn fail_on_page(mut self, page: usize) -> Self {
        self.fail_on_page = Some(page);
        self
    }

    // users/lookup fails with HTTP 500 for any batch containing this id
    pub fn fail_lookup_containing(mut self, id: &str) -> Self {
        self.fail_lookup_containing = Some(id.to_string());
        self
    }

    // users/lookup answers every call with 404 "page does not exist" (code
    // 34), like a wrong base URL would
    pub fn lookup_endpoint_missing(mut self) -> Self {
        self.lookup_missing = true;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    // Highest number of users/lookup calls that were running at the same time
    pub fn peak_lookups_in_flight(&self) -> usize {
        self.peak_lookups_in_flight.load(Ordering::SeqCst)
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.endpoint == endpoint)
            .collect()
    }

    fn follower_page(&self, call: &RecordedCall) -> Result<Value, ApiError> {
        let cursor: i64 = call
            .param("cursor")
            .and_then(|c| c.parse().ok())
            .unwrap_or(-1);
        let count: usize = call
            .param("count")
            .and_then(|c| c.parse().ok())
            .unwrap_or(5000);

        // cursor -1 is page index 0; later cursors are the page index itself
        let page_index = if cursor < 0 { 0 } else { cursor as usize };

        if self.fail_on_page == Some(page_index + 1) {
            return Err(ApiError::Status {
                status: 503,
                code: Some(130),
                message: "Over capacity".to_string(),
            });
        }

        let start = page_index * count;
        let end = (start + count).min(self.follower_ids.len());
        let ids = if start < end {
            self.follower_ids[start..end].to_vec()
        } else {
            Vec::new()
        };
        let next_cursor = if end < self.follower_ids.len() {
            (page_index + 1) as i64
        } else {
            0
        };

        Ok(json!({ "ids": ids, "next_cursor": next_cursor }))
    }

    fn lookup(&self, call: &RecordedCall) -> Result<Value, ApiError> {
        let ids: Vec<&str> = call
            .param("user_id")
            .map(|ids| ids.split(',').collect())
            .unwrap_or_default();

        if self.lookup_missing {
            return Err(ApiError::Status {
                status: 404,
                code: Some(34),
                message: "Sorry, that page does not exist.".to_string(),
            });
        }

        if let Some(bad) = &self.fail_lookup_containing {
            if ids.contains(&bad.as_str()) {
                return Err(ApiError::Status {
                    status: 500,
                    code: Some(131),
                    message: "Internal error".to_string(),
                });
            }
        }

        let users: Vec<Value> = ids
            .iter()
            .filter(|id| !self.hidden.contains(**id))
            .filter_map(|id| {
                self.handles
                    .get(*id)
                    .map(|handle| json!({ "id_str": id, "screen_name": handle }))
            })
            .collect();

        if users.is_empty() {
            return Err(ApiError::Status {
                status: 404,
                code: Some(17),
                message: "No user matches for specified terms.".to_string(),
            });
        }

        Ok(Value::Array(users))
    }
}

#[async_trait]
impl ApiClient for FakeTwitter {
    async fn get(&self, endpoint: &str, query: Query) -> Result<Value, ApiError> {
        let call = RecordedCall {
            endpoint: endpoint.to_string(),
            query,
        };
        self.calls.lock().unwrap().push(call.clone());

        match endpoint {
            "followers/ids" => {
                tokio::task::yield_now().await;
                self.follower_page(&call)
            }
            "users/lookup" => {
                let now = self.lookups_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                self.peak_lookups_in_flight.fetch_max(now, Ordering::SeqCst);

                // stay "on the wire" for a few polls so any sibling batch
                // that was sent without waiting gets counted alongside us
                for _ in 0..8 {
                    tokio::task::yield_now().await;
                }

                let result = self.lookup(&call);
                self.lookups_in_flight.fetch_sub(1, Ordering::SeqCst);
                result
            }
            other => Err(ApiError::Status {
                status: 404,
                code: Some(34),
                message: format!("unknown endpoint {}", other),
            }),
        }
    }
}
