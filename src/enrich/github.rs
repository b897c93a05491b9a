//! enrich::github
//!
//! GitHub metadata adapter over the public REST API.
//!
//! One unauthenticated call per repository: `GET {api_base}/repos/{owner}/{repo}`.
//! Topics map to categories and star/fork counts are carried as the
//! platform-specific extras; GitHub does not expose a cheap download
//! count, so that field is always 0.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::modrinth::{handle_json_response, parse_timestamp, USER_AGENT_VALUE};
use super::traits::{EnrichError, MetadataSource};
use crate::core::types::{ModMetadata, Platform, ProjectRef};

/// GitHub repository response, narrowed to the fields we map.
#[derive(Debug, Deserialize)]
struct GitHubRepo {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
}

/// GitHub adapter.
#[derive(Debug, Clone)]
pub struct GitHubSource {
    client: Client,
    api_base: String,
}

impl GitHubSource {
    /// Create an adapter against the production API.
    pub fn new(client: Client) -> Self {
        Self::with_api_base(client, "https://api.github.com")
    }

    /// Create an adapter against a custom API base (used by tests).
    pub fn with_api_base(client: Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        // GitHub rejects requests without a User-Agent.
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        headers
    }
}

#[async_trait]
impl MetadataSource for GitHubSource {
    fn platform(&self) -> Platform {
        Platform::GitHub
    }

    async fn fetch(&self, reference: &ProjectRef) -> Result<ModMetadata, EnrichError> {
        // reference.id is "owner/repo" for GitHub references.
        let url = format!("{}/repos/{}", self.api_base, reference.id);
        let response = self
            .client
            .get(&url)
            .headers(Self::headers())
            .send()
            .await
            .map_err(|e| EnrichError::Network(e.to_string()))?;

        // Unauthenticated GitHub rate limiting answers 403, not 429.
        if response.status() == StatusCode::FORBIDDEN {
            return Err(EnrichError::RateLimited);
        }

        let repo: GitHubRepo = handle_json_response(response).await?;
        Ok(ModMetadata {
            description: repo.description.unwrap_or_default(),
            download_count: 0,
            date_modified: repo.updated_at.as_deref().and_then(parse_timestamp),
            categories: repo.topics,
            game_versions: Vec::new(),
            screenshots: Vec::new(),
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            platform: Platform::GitHub,
        }
        .capped())
    }
}
