//! GitHub repository-listing fetcher.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;

use crate::{get_with_retry, next_page, FetchError, RepoEntry};

const API_BASE: &str = "https://api.github.com";

/// Subset of the GitHub repository payload the registry cares about.
#[derive(Debug, Deserialize)]
struct GithubRepo {
    html_url: String,
    fork: bool,
    has_issues: bool,
}

/// List every repository of a GitHub owner, following pagination
/// until the listing is exhausted.
pub async fn owner_repositories(
    client: &Client,
    owner: &str,
    token: Option<&str>,
) -> Result<Vec<RepoEntry>, FetchError> {
    let mut url = format!("{API_BASE}/users/{owner}/repos?per_page=100");
    let headers = build_headers(token)?;

    let mut entries = Vec::new();
    loop {
        let response = get_with_retry(client, &url, headers.clone()).await?;
        let next = next_page(&response);

        let page: Vec<GithubRepo> = response.json().await?;
        entries.extend(page.into_iter().map(|repo| RepoEntry {
            url: repo.html_url,
            fork: repo.fork,
            has_issues: repo.has_issues,
        }));

        match next {
            Some(next_url) => url = next_url,
            None => break,
        }
    }

    tracing::debug!(owner, count = entries.len(), "GitHub repositories fetched");
    Ok(entries)
}

fn build_headers(token: Option<&str>) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
    headers.insert(USER_AGENT, HeaderValue::from_static("grove-fetch"));
    if let Some(token) = token {
        let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            FetchError::Api {
                status: 0,
                body: "invalid characters in API token".to_string(),
            }
        })?;
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}
