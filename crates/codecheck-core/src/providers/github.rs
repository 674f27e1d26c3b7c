// GitHub provider implementation - bridges the API client with SearchProvider
use async_trait::async_trait;
use codecheck_api::{ApiError, GitHubSearchClient, RepositorySummary};

use crate::{config::GitHubConfig, search::SearchProvider};

/// Wrapper around GitHubSearchClient that implements SearchProvider
pub struct GitHubProvider {
    client: GitHubSearchClient,
}

impl GitHubProvider {
    pub fn new(client: GitHubSearchClient) -> Self {
        Self { client }
    }

    /// Build a provider from the `[github]` config section
    pub fn from_config(config: &GitHubConfig) -> crate::Result<Self> {
        let client = GitHubSearchClient::with_base_url(&config.api_url, &config.user_agent)?;
        Ok(Self::new(client))
    }

    pub fn client(&self) -> &GitHubSearchClient {
        &self.client
    }
}

#[async_trait]
impl SearchProvider for GitHubProvider {
    async fn search(&self, query: &str) -> Result<Vec<RepositorySummary>, ApiError> {
        self.client.search_repositories(query).await
    }
}
