// src/api/endpoints.rs
// =============================================================================
// Typed requests for the two endpoints the resolver uses:
//
//   followers/ids  - one page (up to 5000) of follower IDs, cursored
//   users/lookup   - profiles for up to 100 IDs at once
//
// Each request struct knows its path, how to turn itself into query
// parameters, and what its response decodes into. That keeps the
// "which params does this endpoint take" knowledge in one place instead of
// building ad-hoc maps at every call site.
// =============================================================================

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use super::Query;
use crate::error::{ResolverError, Result};

// Cursor value that asks for the first page
pub const START_CURSOR: i64 = -1;

// Largest page followers/ids will return
pub const FOLLOWER_IDS_PAGE_SIZE: u32 = 5000;

// Hard ceiling on IDs per users/lookup call
pub const MAX_LOOKUP_BATCH: usize = 100;

pub trait Endpoint {
    const PATH: &'static str;
    type Response: DeserializeOwned;

    fn query(&self) -> Query;
}

/// Which account we're talking about: by handle (screen name) or by numeric ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountRef {
    /// e.g. "rustlang"
    Handle(String),
    /// e.g. "165262228", kept as a string so 64-bit IDs never lose precision
    UserId(String),
}

impl AccountRef {
    // Builds an AccountRef from the two optional forms.
    //
    // Exactly one of them must be given. Handles may carry a leading '@',
    // which is dropped. User IDs must be plain decimal digits.
    pub fn new(handle: Option<&str>, user_id: Option<&str>) -> Result<Self> {
        match (handle, user_id) {
            (Some(handle), None) => {
                let handle = handle.trim().trim_start_matches('@');
                if handle.is_empty() {
                    return Err(ResolverError::InvalidArgument(
                        "account handle is empty".to_string(),
                    ));
                }
                Ok(AccountRef::Handle(handle.to_string()))
            }
            (None, Some(id)) => {
                let id = id.trim();
                if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ResolverError::InvalidArgument(format!(
                        "user id must be numeric, got '{}'",
                        id
                    )));
                }
                Ok(AccountRef::UserId(id.to_string()))
            }
            (None, None) => Err(ResolverError::InvalidArgument(
                "either a handle or a user id is required".to_string(),
            )),
            (Some(handle), Some(id)) => Err(ResolverError::InvalidArgument(format!(
                "got both handle '{}' and user id '{}', expected exactly one",
                handle, id
            ))),
        }
    }

    // The query parameter that names this account
    fn query_pair(&self) -> (&'static str, String) {
        match self {
            AccountRef::Handle(handle) => ("screen_name", handle.clone()),
            AccountRef::UserId(id) => ("user_id", id.clone()),
        }
    }
}

impl std::fmt::Display for AccountRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountRef::Handle(handle) => write!(f, "@{}", handle),
            AccountRef::UserId(id) => write!(f, "user #{}", id),
        }
    }
}

// A bare string is a handle, checked the same way as AccountRef::new
impl TryFrom<&str> for AccountRef {
    type Error = ResolverError;

    fn try_from(handle: &str) -> Result<Self> {
        AccountRef::new(Some(handle), None)
    }
}

impl TryFrom<String> for AccountRef {
    type Error = ResolverError;

    fn try_from(handle: String) -> Result<Self> {
        AccountRef::try_from(handle.as_str())
    }
}

impl TryFrom<&AccountRef> for AccountRef {
    type Error = ResolverError;

    fn try_from(account: &AccountRef) -> Result<Self> {
        Ok(account.clone())
    }
}

// -----------------------------------------------------------------------------
// followers/ids
// -----------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FollowerIdsRequest {
    pub account: AccountRef,
    pub cursor: i64,
    pub count: u32,
}

impl FollowerIdsRequest {
    pub fn first_page(account: AccountRef) -> Self {
        FollowerIdsRequest {
            account,
            cursor: START_CURSOR,
            count: FOLLOWER_IDS_PAGE_SIZE,
        }
    }
}

impl Endpoint for FollowerIdsRequest {
    const PATH: &'static str = "followers/ids";
    type Response = FollowerIdPage;

    fn query(&self) -> Query {
        vec![
            self.account.query_pair(),
            ("count", self.count.to_string()),
            // IDs above 2^53 get mangled by JSON number parsers elsewhere;
            // ask for strings
            ("stringify_ids", "true".to_string()),
            ("cursor", self.cursor.to_string()),
        ]
    }
}

/// One page of follower IDs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FollowerIdPage {
    #[serde(default, deserialize_with = "string_ids")]
    pub ids: Vec<String>,
    /// 0 or missing means this was the last page
    #[serde(default)]
    pub next_cursor: Option<i64>,
}

impl FollowerIdPage {
    // The cursor for the following page, if there is one
    pub fn continuation(&self) -> Option<i64> {
        self.next_cursor.filter(|&cursor| cursor != 0)
    }
}

// Accepts IDs as strings (what we ask for) or as bare numbers
fn string_ids<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Str(String),
        Num(u64),
    }

    let raw = Vec::<RawId>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|id| match id {
            RawId::Str(s) => s,
            RawId::Num(n) => n.to_string(),
        })
        .collect())
}

// -----------------------------------------------------------------------------
// users/lookup
// -----------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct UsersLookupRequest {
    ids: Vec<String>,
}

impl UsersLookupRequest {
    // Fails if more than MAX_LOOKUP_BATCH ids are given; the API would
    // reject the call anyway.
    pub fn new(ids: Vec<String>) -> Result<Self> {
        if ids.len() > MAX_LOOKUP_BATCH {
            return Err(ResolverError::InvalidArgument(format!(
                "users/lookup takes at most {} ids per call, got {}",
                MAX_LOOKUP_BATCH,
                ids.len()
            )));
        }
        Ok(UsersLookupRequest { ids })
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

impl Endpoint for UsersLookupRequest {
    const PATH: &'static str = "users/lookup";
    type Response = Vec<LookupUser>;

    fn query(&self) -> Query {
        vec![
            ("user_id", self.ids.join(",")),
            // We only need id + handle; skip entities and tweet payloads
            ("include_entities", "false".to_string()),
            ("tweet_mode", "false".to_string()),
        ]
    }
}

/// The two fields of a user object we care about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LookupUser {
    #[serde(rename = "id_str")]
    pub id: String,
    #[serde(rename = "screen_name")]
    pub handle: String,
}
