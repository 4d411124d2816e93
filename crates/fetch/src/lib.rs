//! Repository-listing fetchers for the supported forges.
//!
//! Both forges page their listings with an RFC 8288 `Link` header;
//! the fetchers follow `rel="next"` until it disappears and retry
//! transient failures with bounded exponential backoff.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, Response, StatusCode};

pub mod github;
pub mod gitlab;

/// One repository as reported by a forge listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoEntry {
    pub url: String,
    pub fork: bool,
    pub has_issues: bool,
}

/// Errors from the fetcher layer.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The HTTP request itself failed (network, DNS, TLS).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The forge returned a non-2xx status that retrying did not fix.
    #[error("forge API error ({status}): {body}")]
    Api { status: u16, body: String },
}

/// Retry attempts after the first try.
const MAX_RETRIES: u32 = 3;

/// First backoff delay; doubles on each retry.
const BASE_BACKOFF: Duration = Duration::from_millis(500);

/// Issue a GET, retrying transport errors, 429s, and 5xx responses
/// with exponential backoff. Any other non-2xx status fails
/// immediately.
async fn get_with_retry(
    client: &Client,
    url: &str,
    headers: HeaderMap,
) -> Result<Response, FetchError> {
    let mut attempt = 0;
    loop {
        let result = client.get(url).headers(headers.clone()).send().await;

        let retryable = match &result {
            Ok(response) => {
                let status = response.status();
                status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            Err(err) => err.is_connect() || err.is_timeout() || err.is_request(),
        };

        if retryable && attempt < MAX_RETRIES {
            let delay = BASE_BACKOFF * 2u32.pow(attempt);
            tracing::debug!(url, attempt, delay_ms = delay.as_millis() as u64, "retrying fetch");
            tokio::time::sleep(delay).await;
            attempt += 1;
            continue;
        }

        let response = result?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Api {
                status: status.as_u16(),
                body,
            });
        }
        return Ok(response);
    }
}

/// Extract the `rel="next"` target from a `Link` header value, e.g.
/// `<https://api.example.org/repos?page=2>; rel="next", <...>; rel="last"`.
fn parse_next_link(header: &str) -> Option<String> {
    for part in header.split(',') {
        let mut sections = part.split(';');
        let url = sections.next()?.trim();
        let is_next = sections
            .any(|attr| attr.trim().eq_ignore_ascii_case(r#"rel="next""#));
        if is_next {
            return Some(url.trim_start_matches('<').trim_end_matches('>').to_string());
        }
    }
    None
}

/// Read the next-page URL out of a response, if any.
fn next_page(response: &Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::LINK)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_next_link)
}
