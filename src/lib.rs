//! Packnote - modpack changelog core
//!
//! Packnote tracks Minecraft modpack contents across versions: it ingests
//! modlist snapshots, enriches entries with third-party platform metadata
//! (Modrinth, CurseForge, GitHub), computes the added/removed/updated
//! difference between two snapshots, and renders maintainer-annotated
//! changelogs as Markdown, HTML, or Discord-flavored text.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`core`] - Domain types, version comparison, diff engine, changelog
//!   assembly, and JSON snapshot storage
//! - [`enrich`] - Platform metadata adapters behind the [`enrich::MetadataSource`]
//!   trait, with caching, a serialized request queue, and retry/backoff
//! - [`export`] - Pure changelog renderers (Markdown, Discord, HTML)
//!
//! # Correctness Invariants
//!
//! Packnote maintains the following invariants:
//!
//! 1. Diffing is deterministic: the same pair of modlists always yields the
//!    same partition, and a mod name appears in at most one of
//!    added/removed/updated
//! 2. Enrichment never propagates upstream failures; every entry resolves to
//!    either real metadata or a fallback record tagged with its platform
//! 3. Outbound platform calls from one client never overlap and respect a
//!    minimum inter-request delay
//! 4. Exporters perform no I/O and never mutate the changelog they render

pub mod core;
pub mod enrich;
pub mod export;
