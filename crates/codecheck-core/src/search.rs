use async_trait::async_trait;
use codecheck_api::{ApiError, RepositorySummary};

/// Anything that can answer a repository search
///
/// The coordinator only talks to this trait, so tests can hand it a mock
/// and the real app hands it the GitHub provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<RepositorySummary>, ApiError>;
}
