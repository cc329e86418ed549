// src/api/http.rs
// =============================================================================
// The real ApiClient: plain HTTPS GETs against the Twitter v1.1 REST API.
//
// Authentication is application-only: every request carries
//   Authorization: Bearer <token>
// which is all followers/ids and users/lookup need for public accounts.
//
// Error mapping:
// - reqwest failures (DNS, TLS, timeout, ...) -> ApiError::Transport
// - HTTP 429                                  -> ApiError::RateLimited
// - any other non-2xx                         -> ApiError::Status
//                                                (with Twitter's error code)
// - endpoint path that won't join on the base -> ApiError::InvalidUrl
// - body that isn't JSON                      -> ApiError::Decode
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{ApiClient, Query};
use crate::error::{ApiError, ClientError};

pub struct HttpApiClient {
    client: Client,
    base_url: Url,
    bearer_token: String,
}

impl HttpApiClient {
    // Creates a client for `base_url` (e.g. "https://api.twitter.com/1.1/").
    //
    // `timeout` applies to each request; hitting it surfaces as a transport
    // error like any other network failure. The base URL is checked here,
    // so a typo fails before the first request.
    pub fn new(base_url: &str, bearer_token: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = normalize_base(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("follow-check/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(HttpApiClient {
            client,
            base_url,
            bearer_token: bearer_token.to_string(),
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(&format!("{}.json", endpoint))
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn get(&self, endpoint: &str, query: Query) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint_url(endpoint)?;

        debug!(%url, params = query.len(), "GET");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.bearer_token)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::RateLimited {
                reset_at: rate_limit_reset(&response),
            });
        }

        let body = response.text().await?;

        if !status.is_success() {
            let (code, message) = error_details(&body);
            return Err(ApiError::Status {
                status: status.as_u16(),
                code,
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

// Url::join drops the last path segment unless the base ends in '/',
// so "https://api.twitter.com/1.1" would lose its "1.1"
fn normalize_base(base_url: &str) -> Result<Url, ClientError> {
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };

    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }

    let url = Url::parse(&base).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() || url.host().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

fn rate_limit_reset(response: &Response) -> Option<u64> {
    response
        .headers()
        .get("x-rate-limit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

// Twitter error bodies look like {"errors":[{"code":17,"message":"..."}]}.
// Use the first entry's code and message if there is one, otherwise no code
// and the (trimmed) raw body.
fn error_details(body: &str) -> (Option<u32>, String) {
    #[derive(Deserialize)]
    struct ErrorBody {
        errors: Vec<ErrorEntry>,
    }

    #[derive(Deserialize)]
    struct ErrorEntry {
        #[serde(default)]
        code: Option<u32>,
        message: String,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(first) = parsed.errors.into_iter().next() {
            return (first.code, first.message);
        }
    }

    (None, raw_message(body))
}

fn raw_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() > 200 {
        let mut end = 200;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    } else if trimmed.is_empty() {
        "empty response body".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_keeps_version_segment() {
        let client =
            HttpApiClient::new("https://api.twitter.com/1.1", "token", Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            client.endpoint_url("followers/ids").unwrap().as_str(),
            "https://api.twitter.com/1.1/followers/ids.json"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        for base in ["not a url", "mailto:someone@example.com", "ftp://example.com/1.1"] {
            let result = HttpApiClient::new(base, "token", Duration::from_secs(5));
            assert!(
                matches!(result, Err(ClientError::InvalidBaseUrl { .. })),
                "{} should be rejected",
                base
            );
        }
    }

    #[test]
    fn test_error_details_keep_twitter_code() {
        let body = r#"{"errors":[{"code":17,"message":"No user matches for specified terms."}]}"#;
        assert_eq!(
            error_details(body),
            (Some(17), "No user matches for specified terms.".to_string())
        );

        let body = r#"{"errors":[{"code":34,"message":"Sorry, that page does not exist."}]}"#;
        assert_eq!(error_details(body).0, Some(34));
    }

    #[test]
    fn test_error_details_fall_back_to_body() {
        assert_eq!(error_details("  Over capacity  "), (None, "Over capacity".to_string()));
        assert_eq!(error_details("").1, "empty response body");
        assert!(error_details(&"x".repeat(500)).1.ends_with("..."));
    }
}
