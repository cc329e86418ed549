// src/resolver/followers.rs
// =============================================================================
// Collects every follower ID of an account by walking followers/ids pages.
//
// How it works:
// 1. Ask for the first page with cursor -1
// 2. Append that page's IDs
// 3. If next_cursor is non-zero, ask again with it; 0 (or no cursor at all)
//    means we've seen the last page
//
// Pages are fetched one after another since each request needs the cursor
// from the previous response. Any failed page fails the whole collection;
// a partial follower list would produce wrong "not following" answers.
// =============================================================================

use tracing::{debug, info};

use crate::api::{self, AccountRef, ApiClient, FollowerIdsRequest};
use crate::error::Result;

// Returns the follower IDs of `account`, in the order the API lists them.
//
// Makes ceil(followers / 5000) requests (one when there are no followers).
pub async fn collect_follower_ids(client: &dyn ApiClient, account: &AccountRef) -> Result<Vec<String>> {
    let mut request = FollowerIdsRequest::first_page(account.clone());
    let mut ids = Vec::new();
    let mut pages = 0usize;

    loop {
        let page = api::call(client, &request).await?;
        pages += 1;

        let next = page.continuation();
        debug!(
            account = %account,
            page = pages,
            cursor = request.cursor,
            received = page.ids.len(),
            next_cursor = ?next,
            "fetched follower id page"
        );
        ids.extend(page.ids);

        match next {
            Some(cursor) => request.cursor = cursor,
            None => break,
        }
    }

    info!(account = %account, followers = ids.len(), pages, "collected follower ids");
    Ok(ids)
}
