//! enrich::mock
//!
//! Scripted metadata source for deterministic testing.
//!
//! # Design
//!
//! The mock serves pre-programmed responses keyed by project id and
//! records every fetch so tests can assert call counts (cache
//! short-circuits, batch continuation). Failures can be scripted
//! per-key, either permanently or for the first N calls (retry paths).
//!
//! # Example
//!
//! ```
//! use packnote::enrich::mock::MockSource;
//! use packnote::enrich::MetadataSource;
//! use packnote::core::types::{ModMetadata, Platform, ProjectRef};
//!
//! # tokio_test::block_on(async {
//! let source = MockSource::new(Platform::Modrinth)
//!     .respond("sodium", ModMetadata::fallback(Platform::Modrinth));
//!
//! let reference = ProjectRef {
//!     platform: Platform::Modrinth,
//!     id: "sodium".to_string(),
//!     page_url: None,
//! };
//! let meta = source.fetch(&reference).await.unwrap();
//! assert_eq!(meta.platform, Platform::Modrinth);
//! assert_eq!(source.call_count(), 1);
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{EnrichError, MetadataSource};
use crate::core::types::{ModMetadata, Platform, ProjectRef};

/// Scripted mock source.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share
/// state, so a test can keep a handle for assertions after handing one
/// to the client.
#[derive(Debug, Clone)]
pub struct MockSource {
    platform: Platform,
    inner: Arc<Mutex<MockInner>>,
}

#[derive(Debug, Default)]
struct MockInner {
    /// Scripted successful responses by project id.
    responses: HashMap<String, ModMetadata>,
    /// Scripted permanent failures by project id.
    failures: HashMap<String, EnrichError>,
    /// Scripted transient failures: (remaining count, error).
    transient: HashMap<String, (u32, EnrichError)>,
    /// Every fetched project id, in order.
    calls: Vec<String>,
}

impl MockSource {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            inner: Arc::new(Mutex::new(MockInner::default())),
        }
    }

    /// Script a successful response for a project id.
    pub fn respond(self, id: impl Into<String>, metadata: ModMetadata) -> Self {
        self.inner
            .lock()
            .unwrap()
            .responses
            .insert(id.into(), metadata);
        self
    }

    /// Script a permanent failure for a project id.
    pub fn fail(self, id: impl Into<String>, error: EnrichError) -> Self {
        self.inner.lock().unwrap().failures.insert(id.into(), error);
        self
    }

    /// Script a failure for the first `times` fetches of a project id;
    /// later fetches fall through to the scripted response.
    pub fn fail_times(self, id: impl Into<String>, times: u32, error: EnrichError) -> Self {
        self.inner
            .lock()
            .unwrap()
            .transient
            .insert(id.into(), (times, error));
        self
    }

    /// Every fetched project id, in order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Total number of fetches.
    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().calls.len()
    }
}

#[async_trait]
impl MetadataSource for MockSource {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn fetch(&self, reference: &ProjectRef) -> Result<ModMetadata, EnrichError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(reference.id.clone());

        if let Some((remaining, error)) = inner.transient.get_mut(&reference.id) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(error.clone());
            }
        }
        if let Some(error) = inner.failures.get(&reference.id) {
            return Err(error.clone());
        }
        inner
            .responses
            .get(&reference.id)
            .cloned()
            .ok_or_else(|| EnrichError::Api {
                status: 404,
                message: format!("no scripted response for {}", reference.id),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(id: &str) -> ProjectRef {
        ProjectRef {
            platform: Platform::Modrinth,
            id: id.to_string(),
            page_url: None,
        }
    }

    #[tokio::test]
    async fn serves_scripted_response() {
        let source = MockSource::new(Platform::Modrinth)
            .respond("a", ModMetadata::fallback(Platform::Modrinth));
        assert!(source.fetch(&reference("a")).await.is_ok());
        assert!(source.fetch(&reference("missing")).await.is_err());
        assert_eq!(source.calls(), vec!["a", "missing"]);
    }

    #[tokio::test]
    async fn transient_failures_expire() {
        let source = MockSource::new(Platform::Modrinth)
            .respond("a", ModMetadata::fallback(Platform::Modrinth))
            .fail_times("a", 2, EnrichError::RateLimited);

        assert!(source.fetch(&reference("a")).await.is_err());
        assert!(source.fetch(&reference("a")).await.is_err());
        assert!(source.fetch(&reference("a")).await.is_ok());
        assert_eq!(source.call_count(), 3);
    }
}
