//! GitLab repository-listing fetcher.

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;

use crate::{get_with_retry, next_page, FetchError, RepoEntry};

const API_BASE: &str = "https://gitlab.com/api/v4";

/// Subset of the GitLab project payload the registry cares about.
///
/// GitLab marks forks by attaching the origin project rather than a
/// boolean flag.
#[derive(Debug, Deserialize)]
struct GitlabProject {
    web_url: String,
    #[serde(default)]
    forked_from_project: Option<serde_json::Value>,
    #[serde(default)]
    issues_enabled: bool,
}

/// List every project of a GitLab user, following pagination until
/// the listing is exhausted.
pub async fn owner_repositories(
    client: &Client,
    owner: &str,
    token: Option<&str>,
) -> Result<Vec<RepoEntry>, FetchError> {
    let mut url = format!("{API_BASE}/users/{owner}/projects?per_page=100");
    let headers = build_headers(token)?;

    let mut entries = Vec::new();
    loop {
        let response = get_with_retry(client, &url, headers.clone()).await?;
        let next = next_page(&response);

        let page: Vec<GitlabProject> = response.json().await?;
        entries.extend(page.into_iter().map(|project| RepoEntry {
            url: project.web_url,
            fork: project.forked_from_project.is_some(),
            has_issues: project.issues_enabled,
        }));

        match next {
            Some(next_url) => url = next_url,
            None => break,
        }
    }

    tracing::debug!(owner, count = entries.len(), "GitLab projects fetched");
    Ok(entries)
}

fn build_headers(token: Option<&str>) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("grove-fetch"));
    if let Some(token) = token {
        let value = HeaderValue::from_str(token).map_err(|_| FetchError::Api {
            status: 0,
            body: "invalid characters in API token".to_string(),
        })?;
        headers.insert("PRIVATE-TOKEN", value);
    }
    Ok(headers)
}
