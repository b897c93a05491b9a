//! enrich::client
//!
//! Metadata enrichment orchestrator.
//!
//! # Design
//!
//! The client owns the pieces the adapters deliberately do not: the
//! cache, the serialized request queue, and the retry policy. A fetch
//! flows cache -> queue -> retry -> adapter, and every failure path
//! terminates in a fallback record, so enrichment can never fail a
//! changelog build. Entries without a resolvable project reference
//! (unknown platform, no URL) skip the network entirely.
//!
//! Batch enrichment is sequential on purpose: the queue would serialize
//! concurrent fetches anyway, and sequential order keeps the progress
//! callback monotonic and the output aligned with the input.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::backoff::{retry, RetryPolicy};
use super::cache::{CacheStats, MetadataCache};
use super::config::{ConfigError, EnrichConfig};
use super::curseforge::CurseForgeSource;
use super::github::GitHubSource;
use super::modrinth::ModrinthSource;
use super::queue::RequestQueue;
use super::traits::MetadataSource;
use crate::core::types::{EnrichedModEntry, ModEntry, ModMetadata, Platform, ProjectRef};

/// Orchestrates platform adapters behind a cache, a serialized request
/// queue, and a shared retry policy.
pub struct EnrichmentClient {
    sources: HashMap<Platform, Arc<dyn MetadataSource>>,
    cache: Arc<MetadataCache>,
    queue: RequestQueue,
    policy: RetryPolicy,
    config: EnrichConfig,
}

impl EnrichmentClient {
    /// Build a client with the real platform adapters.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the config fails validation
    /// or the HTTP client cannot be constructed.
    pub fn new(config: EnrichConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ConfigError::InvalidValue(format!("http client: {e}")))?;

        let mut sources: HashMap<Platform, Arc<dyn MetadataSource>> = HashMap::new();
        sources.insert(
            Platform::Modrinth,
            Arc::new(ModrinthSource::with_api_base(
                http.clone(),
                config.modrinth_api_base.clone(),
            )),
        );
        sources.insert(
            Platform::GitHub,
            Arc::new(GitHubSource::with_api_base(
                http.clone(),
                config.github_api_base.clone(),
            )),
        );
        sources.insert(
            Platform::CurseForge,
            Arc::new(CurseForgeSource::new(http, config.curseforge_scrape)),
        );

        Ok(Self::assemble(sources, Arc::new(MetadataCache::new()), config))
    }

    /// Build a client from explicit adapters (used by tests).
    pub fn with_sources(
        sources: Vec<Arc<dyn MetadataSource>>,
        config: EnrichConfig,
    ) -> Self {
        let sources = sources
            .into_iter()
            .map(|source| (source.platform(), source))
            .collect();
        Self::assemble(sources, Arc::new(MetadataCache::new()), config)
    }

    /// Replace the cache with a shared one, so several clients can pool
    /// their results.
    pub fn with_shared_cache(mut self, cache: Arc<MetadataCache>) -> Self {
        self.cache = cache;
        self
    }

    fn assemble(
        sources: HashMap<Platform, Arc<dyn MetadataSource>>,
        cache: Arc<MetadataCache>,
        config: EnrichConfig,
    ) -> Self {
        Self {
            sources,
            cache,
            queue: RequestQueue::new(),
            policy: config.retry.policy(),
            config,
        }
    }

    /// Enrich one entry. Infallible: any fetch failure degrades to a
    /// fallback record carrying the entry's platform.
    pub async fn enrich(&self, entry: &ModEntry) -> EnrichedModEntry {
        let metadata = self.fetch_metadata(entry).await;
        EnrichedModEntry {
            entry: entry.clone(),
            metadata,
        }
    }

    /// Enrich a whole modlist in input order.
    ///
    /// `progress(done, total)` fires once per entry, after that entry
    /// completes; `done` counts up from 1 to `total`.
    pub async fn enrich_all(
        &self,
        entries: &[ModEntry],
        mut progress: impl FnMut(usize, usize),
    ) -> Vec<EnrichedModEntry> {
        let total = entries.len();
        let mut enriched = Vec::with_capacity(total);
        for (index, entry) in entries.iter().enumerate() {
            enriched.push(self.enrich(entry).await);
            progress(index + 1, total);
        }
        info!(total, cached = self.cache.len(), "modlist enrichment complete");
        enriched
    }

    /// Size and key list of the metadata cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop every cached record.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    async fn fetch_metadata(&self, entry: &ModEntry) -> ModMetadata {
        let Some(reference) = ProjectRef::for_entry(entry) else {
            debug!(name = %entry.name, "no project reference, using fallback");
            return ModMetadata::fallback(entry.platform);
        };
        let Some(source) = self.sources.get(&reference.platform) else {
            debug!(name = %entry.name, platform = %reference.platform, "no adapter, using fallback");
            return ModMetadata::fallback(entry.platform);
        };

        // Cache hits skip the queue entirely, so a warm run costs nothing.
        if let Some(cached) = self.cache.get(&reference) {
            debug!(key = %reference, "cache hit");
            return cached;
        }

        let cooldown = self.config.cooldown_for(reference.platform);
        let result = self
            .queue
            .run(cooldown, retry(&self.policy, || source.fetch(&reference)))
            .await;

        match result {
            Ok(metadata) => {
                // Only successes are cached; fallbacks stay retryable.
                self.cache.insert(reference, metadata.clone());
                metadata
            }
            Err(err) => {
                warn!(name = %entry.name, key = %reference, %err, "enrichment failed, using fallback");
                ModMetadata::fallback(entry.platform)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Platform;
    use crate::enrich::mock::MockSource;
    use crate::enrich::traits::EnrichError;

    fn fast_config() -> EnrichConfig {
        EnrichConfig {
            modrinth_delay_ms: 0,
            curseforge_delay_ms: 0,
            github_delay_ms: 0,
            ..EnrichConfig::default()
        }
    }

    fn sample_metadata() -> ModMetadata {
        ModMetadata {
            description: "Rendering engine rewrite".to_string(),
            download_count: 1_000_000,
            ..ModMetadata::fallback(Platform::Modrinth)
        }
    }

    #[tokio::test]
    async fn cache_hit_skips_the_source() {
        let source = MockSource::new(Platform::Modrinth).respond("sodium", sample_metadata());
        let client =
            EnrichmentClient::with_sources(vec![Arc::new(source.clone())], fast_config());
        let entry = ModEntry::new("Sodium", "0.5.8")
            .with_url("https://modrinth.com/mod/sodium");

        let first = client.enrich(&entry).await;
        let second = client.enrich(&entry).await;

        assert_eq!(first.metadata.download_count, 1_000_000);
        assert_eq!(second.metadata, first.metadata);
        assert_eq!(source.call_count(), 1);
        assert_eq!(client.cache_stats().size, 1);
    }

    #[tokio::test]
    async fn failure_degrades_to_fallback_and_is_not_cached() {
        let source = MockSource::new(Platform::Modrinth).fail(
            "sodium",
            EnrichError::Api {
                status: 500,
                message: "internal".to_string(),
            },
        );
        let mut config = fast_config();
        config.retry.max_attempts = 1;
        config.retry.base_delay_ms = 0;
        let client = EnrichmentClient::with_sources(vec![Arc::new(source)], config);
        let entry = ModEntry::new("Sodium", "0.5.8")
            .with_url("https://modrinth.com/mod/sodium");

        let enriched = client.enrich(&entry).await;
        assert_eq!(enriched.metadata, ModMetadata::fallback(Platform::Modrinth));
        assert_eq!(client.cache_stats().size, 0);
    }

    #[tokio::test]
    async fn unknown_platform_never_touches_the_network() {
        let source = MockSource::new(Platform::Modrinth);
        let client =
            EnrichmentClient::with_sources(vec![Arc::new(source.clone())], fast_config());
        let entry = ModEntry::new("Local Mod", "1.0.0");

        let enriched = client.enrich(&entry).await;
        assert_eq!(enriched.metadata.platform, Platform::Other);
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn retry_recovers_from_transient_failures() {
        let source = MockSource::new(Platform::Modrinth)
            .respond("sodium", sample_metadata())
            .fail_times("sodium", 2, EnrichError::RateLimited);
        let mut config = fast_config();
        config.retry.base_delay_ms = 0;
        let client =
            EnrichmentClient::with_sources(vec![Arc::new(source.clone())], config);
        let entry = ModEntry::new("Sodium", "0.5.8")
            .with_url("https://modrinth.com/mod/sodium");

        let enriched = client.enrich(&entry).await;
        assert_eq!(enriched.metadata.download_count, 1_000_000);
        assert_eq!(source.call_count(), 3);
    }

    #[tokio::test]
    async fn shared_cache_pools_results_across_clients() {
        let cache = Arc::new(MetadataCache::new());
        let source = MockSource::new(Platform::Modrinth).respond("sodium", sample_metadata());
        let first = EnrichmentClient::with_sources(vec![Arc::new(source.clone())], fast_config())
            .with_shared_cache(Arc::clone(&cache));
        let second = EnrichmentClient::with_sources(vec![Arc::new(source.clone())], fast_config())
            .with_shared_cache(cache);
        let entry = ModEntry::new("Sodium", "0.5.8")
            .with_url("https://modrinth.com/mod/sodium");

        first.enrich(&entry).await;
        second.enrich(&entry).await;
        assert_eq!(source.call_count(), 1);
    }
}
