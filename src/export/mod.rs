//! export
//!
//! Changelog renderers.
//!
//! # Design
//!
//! Every renderer is a pure function from `(&Changelog, &ExportContext)`
//! to a `String`: no I/O, no clock, no randomness. The same changelog
//! always renders to the same bytes, so outputs can be snapshotted and
//! diffed. The changelog's own `created_at` is the only timestamp that
//! ever appears.
//!
//! Formats:
//! - [`markdown`] - full Markdown document with per-mod sections
//! - [`discord`] - compact Discord-flavored Markdown, one line per mod
//! - [`html`] - standalone HTML page with inline styling
//! - JSON is just serde: [`json`]

pub mod discord;
pub mod html;
pub mod markdown;

use crate::core::changelog::Changelog;

/// Labels shared by every export format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportContext {
    /// Modpack or project name for the document title
    pub project_name: String,
    /// Display label of the base snapshot
    pub base_label: String,
    /// Display label of the target snapshot
    pub target_label: String,
}

impl ExportContext {
    pub fn new(
        project_name: impl Into<String>,
        base_label: impl Into<String>,
        target_label: impl Into<String>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            base_label: base_label.into(),
            target_label: target_label.into(),
        }
    }

    /// Context that reuses the changelog's own snapshot labels.
    pub fn for_changelog(project_name: impl Into<String>, changelog: &Changelog) -> Self {
        Self::new(
            project_name,
            changelog.base_ref.clone(),
            changelog.target_ref.clone(),
        )
    }
}

/// Pretty-printed JSON export of the changelog itself.
pub fn json(changelog: &Changelog) -> serde_json::Result<String> {
    serde_json::to_string_pretty(changelog)
}
