//! enrich
//!
//! Third-party metadata enrichment for mod entries.
//!
//! # Architecture
//!
//! The [`MetadataSource`] trait defines one adapter per platform
//! (Modrinth and GitHub over REST, CurseForge by scraping the public
//! project page through CORS relays). The [`EnrichmentClient`] owns the
//! adapters plus the three cross-cutting pieces:
//!
//! - [`cache`]: explicit per-client cache keyed by [`ProjectRef`]; a hit
//!   short-circuits the queue entirely
//! - [`queue`]: serialized request executor; at most one outbound call in
//!   flight per client, with a minimum delay after each completion
//! - [`backoff`]: exponential retry policy shared by every adapter
//!
//! Enrichment never propagates upstream failures to the caller: after the
//! retry budget is exhausted the entry degrades to
//! [`ModMetadata::fallback`] with the requested platform tag preserved.
//!
//! # Modules
//!
//! - `traits`: [`MetadataSource`] trait and [`EnrichError`] taxonomy
//! - [`modrinth`]: Modrinth REST adapter
//! - [`github`]: GitHub REST adapter
//! - [`curseforge`]: CurseForge scrape adapter
//! - [`mock`]: scripted adapter for deterministic testing
//! - [`client`]: the orchestrating [`EnrichmentClient`]
//! - [`config`]: per-platform delays, retry policy, timeouts
//!
//! [`ProjectRef`]: crate::core::types::ProjectRef
//! [`ModMetadata::fallback`]: crate::core::types::ModMetadata::fallback
//!
//! # Example
//!
//! ```ignore
//! use packnote::enrich::{EnrichConfig, EnrichmentClient};
//!
//! let client = EnrichmentClient::new(EnrichConfig::default())?;
//! let enriched = client
//!     .enrich_all(&modlist, |done, total| eprintln!("{done}/{total}"))
//!     .await;
//! ```

pub mod backoff;
pub mod cache;
pub mod client;
pub mod config;
pub mod curseforge;
pub mod github;
pub mod mock;
pub mod modrinth;
pub mod queue;
mod traits;

pub use client::EnrichmentClient;
pub use config::EnrichConfig;
pub use traits::*;
