use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One repository from a search result
///
/// Every item from the same search shares one `searched_at` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    /// Full name, e.g. "owner/repo"
    pub name: String,
    /// Owner avatar URL, empty when the API didn't give us one
    pub owner_icon_url: String,
    /// Primary language, empty when unknown
    pub language: String,
    pub stargazers_count: u64,
    pub watchers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    pub searched_at: DateTime<Utc>,
}
