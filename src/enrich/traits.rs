//! enrich::traits
//!
//! Metadata source trait for platform adapters.
//!
//! # Design
//!
//! The `MetadataSource` trait is async because every fetch involves
//! network I/O. Adapters return `Result` so the client can distinguish
//! retry-worthy failures from permanent ones, but nothing past the client
//! boundary ever sees these errors: exhausted retries degrade to a
//! fallback record.

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::{ModMetadata, Platform, ProjectRef};

/// Errors from platform metadata fetches.
///
/// All variants are treated as transient by the retry driver; whichever
/// survives the retry budget is logged and mapped to a fallback record.
#[derive(Debug, Clone, Error)]
pub enum EnrichError {
    /// Network or connection error.
    #[error("network error: {0}")]
    Network(String),

    /// Upstream API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Rate limit exceeded (429, or GitHub's 403 variant).
    #[error("rate limited")]
    RateLimited,

    /// Response arrived but could not be parsed.
    #[error("malformed response body: {0}")]
    MalformedBody(String),

    /// Every configured CORS relay failed to produce usable HTML.
    #[error("all relays failed: {0}")]
    RelaysExhausted(String),

    /// The platform has no adapter (or the adapter is disabled).
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(Platform),
}

/// A platform metadata adapter.
///
/// One implementation per platform. Implementations must be `Send + Sync`
/// so the client can hold them as shared trait objects.
///
/// # Contract
///
/// `fetch` performs exactly one logical lookup for the reference and maps
/// the platform's response fields onto the canonical [`ModMetadata`]
/// shape. It does not retry, queue, or cache; those concerns live in the
/// client.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// The platform this adapter serves.
    fn platform(&self) -> Platform;

    /// Fetch and normalize metadata for a project reference.
    ///
    /// # Errors
    ///
    /// - `Network` on connection/transport failures
    /// - `Api` on non-success status codes
    /// - `RateLimited` on 429 (retried with backoff by the client)
    /// - `MalformedBody` when the response cannot be parsed
    /// - `RelaysExhausted` when a scrape adapter runs out of relays
    async fn fetch(&self, reference: &ProjectRef) -> Result<ModMetadata, EnrichError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enrich_error_display() {
        assert_eq!(
            format!("{}", EnrichError::Network("connection refused".into())),
            "network error: connection refused"
        );
        assert_eq!(
            format!(
                "{}",
                EnrichError::Api {
                    status: 404,
                    message: "Not Found".into()
                }
            ),
            "API error: 404 - Not Found"
        );
        assert_eq!(format!("{}", EnrichError::RateLimited), "rate limited");
        assert_eq!(
            format!("{}", EnrichError::UnsupportedPlatform(Platform::Other)),
            "unsupported platform: other"
        );
    }
}
