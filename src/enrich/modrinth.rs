//! enrich::modrinth
//!
//! Modrinth metadata adapter over the public REST API.
//!
//! One unauthenticated call per project: `GET {api_base}/project/{id}`.
//! Modrinth asks clients to identify themselves with a User-Agent and to
//! stay under its rate limit; the client's queue handles the pacing, the
//! header is set here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use super::traits::{EnrichError, MetadataSource};
use crate::core::types::{ModMetadata, Platform, ProjectRef};

/// User-Agent header value for API requests.
pub(crate) const USER_AGENT_VALUE: &str = "packnote";

/// Modrinth project response, narrowed to the fields we map.
#[derive(Debug, Deserialize)]
struct ModrinthProject {
    #[serde(default)]
    description: String,
    #[serde(default)]
    downloads: u64,
    #[serde(default)]
    updated: Option<String>,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    gallery: Vec<GalleryImage>,
    #[serde(default)]
    game_versions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GalleryImage {
    #[serde(default)]
    url: String,
}

/// Modrinth adapter.
#[derive(Debug, Clone)]
pub struct ModrinthSource {
    client: Client,
    api_base: String,
}

impl ModrinthSource {
    /// Create an adapter against the production API.
    pub fn new(client: Client) -> Self {
        Self::with_api_base(client, "https://api.modrinth.com/v2")
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
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }
}

#[async_trait]
impl MetadataSource for ModrinthSource {
    fn platform(&self) -> Platform {
        Platform::Modrinth
    }

    async fn fetch(&self, reference: &ProjectRef) -> Result<ModMetadata, EnrichError> {
        let url = format!("{}/project/{}", self.api_base, reference.id);
        let response = self
            .client
            .get(&url)
            .headers(Self::headers())
            .send()
            .await
            .map_err(|e| EnrichError::Network(e.to_string()))?;

        let project: ModrinthProject = handle_json_response(response).await?;
        Ok(ModMetadata {
            description: project.description,
            download_count: project.downloads,
            date_modified: project.updated.as_deref().and_then(parse_timestamp),
            categories: project.categories,
            game_versions: project.game_versions,
            screenshots: project
                .gallery
                .into_iter()
                .map(|img| img.url)
                .filter(|u| !u.is_empty())
                .collect(),
            stars: 0,
            forks: 0,
            platform: Platform::Modrinth,
        }
        .capped())
    }
}

/// Parse an RFC 3339 timestamp, tolerating absence by returning `None`.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Map a REST response to a deserialized body or an [`EnrichError`].
///
/// Shared by the Modrinth and GitHub adapters: 2xx bodies are parsed,
/// 429 maps to `RateLimited`, everything else to `Api`.
pub(crate) async fn handle_json_response<T: for<'de> Deserialize<'de>>(
    response: Response,
) -> Result<T, EnrichError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(EnrichError::RateLimited);
    }
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(EnrichError::Api {
            status: status.as_u16(),
            message: truncate_message(&message),
        });
    }
    response
        .json()
        .await
        .map_err(|e| EnrichError::MalformedBody(e.to_string()))
}

/// Keep error messages log-friendly; upstream HTML error pages can be huge.
fn truncate_message(message: &str) -> String {
    const MAX: usize = 200;
    let trimmed = message.trim();
    if trimmed.len() <= MAX {
        trimmed.to_string()
    } else {
        let mut end = MAX;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_timestamp_accepts_rfc3339() {
        let ts = parse_timestamp("2024-03-01T12:00:00Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-01T12:00:00+00:00");
        assert!(parse_timestamp("last tuesday").is_none());
    }

    #[test]
    fn truncate_message_bounds_length() {
        let long = "x".repeat(500);
        let out = truncate_message(&long);
        assert!(out.len() <= 203);
        assert!(out.ends_with("..."));
        assert_eq!(truncate_message("  short  "), "short");
    }
}
