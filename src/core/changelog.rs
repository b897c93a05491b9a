//! core::changelog
//!
//! Changelog assembly: binding a diff to maintainer-authored commentary.
//!
//! A changelog is created once per (base, target) comparison a maintainer
//! chooses to annotate. It stays mutable (notes edited repeatedly) until
//! handed to an exporter, which treats it as read-only. Serialization
//! round-trips: `deserialize(serialize(c))` reproduces an equivalent
//! changelog.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::diff::Diff;

/// A diff plus maintainer commentary, the unit that gets exported.
///
/// Per-mod notes are keyed by mod name in a `BTreeMap` so serialized
/// output is deterministic.
///
/// # Example
///
/// ```
/// use packnote::core::changelog::Changelog;
/// use packnote::core::diff::diff;
/// use packnote::core::types::ModEntry;
///
/// let base = vec![ModEntry::new("JEI", "1.0")];
/// let target = vec![ModEntry::new("JEI", "1.1"), ModEntry::new("Waila", "1.0")];
///
/// let mut changelog = Changelog::new(diff(&base, &target), "v1.0", "v1.1");
/// changelog.set_note("Waila", "Replaces the old tooltip mod");
/// assert_eq!(changelog.summary(), "2 changes: 1 added, 1 updated.");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Changelog {
    /// Unique changelog id
    pub id: Uuid,
    /// Label of the base snapshot (e.g. "v1.0")
    pub base_ref: String,
    /// Label of the target snapshot
    pub target_ref: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Free-text notes covering the release as a whole
    pub overall_notes: String,
    /// The computed difference this changelog annotates
    pub diff: Diff,
    /// Per-mod notes keyed by mod name
    pub mod_notes: BTreeMap<String, String>,
}

impl Changelog {
    /// Create a changelog for a computed diff.
    ///
    /// Every changed mod name (added ∪ removed ∪ updated) gets a
    /// conceptual note slot; slots are filled lazily by [`set_note`].
    ///
    /// [`set_note`]: Changelog::set_note
    pub fn new(diff: Diff, base_ref: impl Into<String>, target_ref: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            base_ref: base_ref.into(),
            target_ref: target_ref.into(),
            created_at: Utc::now(),
            overall_notes: String::new(),
            diff,
            mod_notes: BTreeMap::new(),
        }
    }

    /// Names with a note slot: every mod in added, removed, or updated.
    pub fn changed_names(&self) -> BTreeSet<&str> {
        self.diff
            .added
            .iter()
            .map(|m| m.name.as_str())
            .chain(self.diff.removed.iter().map(|m| m.name.as_str()))
            .chain(self.diff.updated.iter().map(|u| u.name.as_str()))
            .collect()
    }

    /// Upsert the note for a changed mod.
    ///
    /// Returns `false` (and stores nothing) when `name` is not part of
    /// this changelog's diff; a stray note is a no-op, not an error.
    pub fn set_note(&mut self, name: &str, text: impl Into<String>) -> bool {
        if !self.changed_names().contains(name) {
            return false;
        }
        self.mod_notes.insert(name.to_string(), text.into());
        true
    }

    /// The note for a mod, if one was written and is non-empty.
    pub fn note(&self, name: &str) -> Option<&str> {
        self.mod_notes
            .get(name)
            .map(String::as_str)
            .filter(|n| !n.trim().is_empty())
    }

    /// Set the overall release notes.
    pub fn set_overall_notes(&mut self, text: impl Into<String>) {
        self.overall_notes = text.into();
    }

    /// One-line human summary of the change counts.
    ///
    /// Zero-count categories are omitted; an empty diff reads
    /// "No changes detected".
    pub fn summary(&self) -> String {
        let added = self.diff.added.len();
        let updated = self.diff.updated.len();
        let removed = self.diff.removed.len();
        let total = added + updated + removed;

        if total == 0 {
            return "No changes detected".to_string();
        }

        let mut parts = Vec::new();
        if added > 0 {
            parts.push(format!("{} added", added));
        }
        if updated > 0 {
            parts.push(format!("{} updated", updated));
        }
        if removed > 0 {
            parts.push(format!("{} removed", removed));
        }
        format!("{} changes: {}.", total, parts.join(", "))
    }
}
