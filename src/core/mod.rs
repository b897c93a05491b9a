//! core
//!
//! Core domain types and operations for Packnote.
//!
//! # Modules
//!
//! - [`types`] - Domain records: Platform, ModEntry, ModMetadata, ProjectRef
//! - [`version`] - Version string comparison used by the diff engine
//! - [`modlist`] - Modlist JSON ingestion and validation
//! - [`diff`] - Added/removed/updated partition between two modlists
//! - [`changelog`] - Changelog assembly and per-mod note management
//! - [`store`] - JSON snapshot and changelog persistence
//!
//! # Design Principles
//!
//! - Diffing and changelog assembly are pure and deterministic
//! - Enriched records never mutate their source entries
//! - All records round-trip through serde JSON

pub mod changelog;
pub mod diff;
pub mod modlist;
pub mod store;
pub mod types;
pub mod version;
