// src/resolver/mod.rs
// =============================================================================
// The follower-checking core.
//
// Submodules:
// - followers: walks followers/ids pages to collect every follower ID
// - lookup: resolves IDs to handles via users/lookup, 100 at a time
// - status: ties the two together and matches against a check-list
// =============================================================================

mod followers;
mod lookup;
mod status;

pub use followers::collect_follower_ids;
pub use lookup::{lookup_batch, resolve_ids, ResolvedName, Resolution};
pub use status::{match_following, FollowingReport, FollowingStatusMap, FollowingStatusResolver};
