// GitHub repository search client
use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{ApiError, Result};
use crate::types::RepositorySummary;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const GITHUB_MEDIA_TYPE: &str = "application/vnd.github.v3+json";
pub const DEFAULT_USER_AGENT: &str = concat!("codecheck/", env!("CARGO_PKG_VERSION"));

/// Talks to the `/search/repositories` endpoint and nothing else.
///
/// Never retries. A failed search comes back as a classified [`ApiError`]
/// and the caller decides what to do about it.
pub struct GitHubSearchClient {
    client: reqwest::Client,
    base_url: String,
    clock: Arc<dyn Clock>,
}

impl GitHubSearchClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(GITHUB_API_BASE, DEFAULT_USER_AGENT)
    }

    /// For GitHub Enterprise or a local mock server
    pub fn with_base_url(base_url: &str, user_agent: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            clock: Arc::new(SystemClock),
        })
    }

    /// Swap the time source used for `searched_at` and rate-limit resets
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search repositories by keyword
    pub async fn search_repositories(&self, query: &str) -> Result<Vec<RepositorySummary>> {
        let url = format!("{}/search/repositories", self.base_url);
        debug!("GET {} q={}", url, query);

        let response = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            let body = response.text().await?;
            let items = parse_search_items(&body, self.clock.now())?;
            debug!("Search for '{}' returned {} items", query, items.len());
            return Ok(items);
        }

        let description = status.canonical_reason().unwrap_or("Unknown");
        let err = ApiError::classify(
            status.as_u16(),
            description,
            response.headers(),
            self.clock.now(),
        );
        warn!("Search for '{}' failed: {}", query, err);
        Err(err)
    }
}

/// Pull repository summaries out of a search response body.
///
/// Missing or null `items` means no results. Null entries are skipped and
/// missing fields fall back to empty strings and zeroes.
pub fn parse_search_items(body: &str, searched_at: DateTime<Utc>) -> Result<Vec<RepositorySummary>> {
    let json: Value = serde_json::from_str(body)?;

    let items = match json.get("items").and_then(Value::as_array) {
        Some(items) => items,
        None => return Ok(Vec::new()),
    };

    Ok(items
        .iter()
        .filter(|item| item.is_object())
        .map(|item| summary_from_json(item, searched_at))
        .collect())
}

fn summary_from_json(item: &Value, searched_at: DateTime<Utc>) -> RepositorySummary {
    RepositorySummary {
        name: string_field(item, "full_name"),
        owner_icon_url: item
            .get("owner")
            .map(|owner| string_field(owner, "avatar_url"))
            .unwrap_or_default(),
        language: string_field(item, "language"),
        stargazers_count: count_field(item, "stargazers_count"),
        watchers_count: count_field(item, "watchers_count"),
        forks_count: count_field(item, "forks_count"),
        open_issues_count: count_field(item, "open_issues_count"),
        searched_at,
    }
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn count_field(value: &Value, key: &str) -> u64 {
    value.get(key).and_then(Value::as_u64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn searched_at() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    #[test]
    fn test_parse_full_item() {
        let body = r#"{
            "total_count": 1,
            "items": [{
                "full_name": "test/repo",
                "owner": {"avatar_url": "https://avatars.example/u/1"},
                "language": "Rust",
                "stargazers_count": 1,
                "watchers_count": 2,
                "forks_count": 3,
                "open_issues_count": 4
            }]
        }"#;

        let items = parse_search_items(body, searched_at()).unwrap();
        assert_eq!(
            items,
            vec![RepositorySummary {
                name: "test/repo".to_string(),
                owner_icon_url: "https://avatars.example/u/1".to_string(),
                language: "Rust".to_string(),
                stargazers_count: 1,
                watchers_count: 2,
                forks_count: 3,
                open_issues_count: 4,
                searched_at: searched_at(),
            }]
        );
    }

    #[test]
    fn test_missing_or_null_items_is_empty() {
        assert!(parse_search_items("{}", searched_at()).unwrap().is_empty());
        assert!(parse_search_items(r#"{"items": null}"#, searched_at())
            .unwrap()
            .is_empty());
        assert!(parse_search_items(r#"{"items": "what"}"#, searched_at())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_null_entries_are_skipped() {
        let body = r#"{"items": [null, {"full_name": "a/b"}, null]}"#;
        let items = parse_search_items(body, searched_at()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "a/b");
    }

    #[test]
    fn test_missing_fields_default() {
        let body = r#"{"items": [
            {"owner": null, "language": null, "stargazers_count": "lots"},
            {"full_name": "x/y", "owner": {}}
        ]}"#;
        let items = parse_search_items(body, searched_at()).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "");
        assert_eq!(items[0].owner_icon_url, "");
        assert_eq!(items[0].language, "");
        assert_eq!(items[0].stargazers_count, 0);
        assert_eq!(items[0].open_issues_count, 0);
        assert_eq!(items[1].owner_icon_url, "");
    }

    #[test]
    fn test_batch_shares_timestamp() {
        let body = r#"{"items": [{"full_name": "a/a"}, {"full_name": "b/b"}]}"#;
        let items = parse_search_items(body, searched_at()).unwrap();
        assert!(items.iter().all(|i| i.searched_at == searched_at()));
    }

    #[test]
    fn test_non_json_body_is_a_parse_error() {
        let err = parse_search_items("<html>", searched_at()).unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
        assert!(err.is_generic());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = GitHubSearchClient::with_base_url("http://localhost:1234/", "test").unwrap();
        assert_eq!(client.base_url(), "http://localhost:1234");
    }
}
