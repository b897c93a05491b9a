//! core::diff
//!
//! Added/removed/updated partition between two modlist snapshots.
//!
//! # Algorithm
//!
//! Both lists are indexed by mod name (later duplicates silently overwrite
//! earlier ones), then:
//!
//! - `added`: target entries absent from the base index, in target order
//! - `removed`: base entries absent from the target index, in base order
//! - `updated`: names present in both where [`is_newer`] reports the target
//!   version as newer, in target order
//!
//! # Invariants
//!
//! - A mod name appears in at most one of added/removed/updated
//! - A name present in both lists with an unchanged version appears nowhere
//! - The same inputs always produce identical output (no randomness, no
//!   time-dependent tie-breaks)

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::types::ModEntry;
use super::version::is_newer;

/// One version change between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModUpdate {
    /// Mod name (diff key)
    pub name: String,
    /// Version in the base snapshot
    pub old_version: String,
    /// Version in the target snapshot
    pub new_version: String,
    /// The target snapshot's entry for this mod
    pub entry: ModEntry,
}

/// The added/removed/updated partition between two modlists.
///
/// Derived data: recomputed on every comparison and persisted only inside
/// a changelog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diff {
    /// Mods present only in the target snapshot, in target order
    pub added: Vec<ModEntry>,
    /// Mods present only in the base snapshot, in base order
    pub removed: Vec<ModEntry>,
    /// Mods in both snapshots with a newer target version, in target order
    pub updated: Vec<ModUpdate>,
}

impl Diff {
    /// True when nothing changed between the snapshots.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }

    /// Total number of changes across all three buckets.
    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.updated.len()
    }

    /// Summary statistics for a diff over the given snapshot sizes.
    pub fn stats(&self, total_base: usize, total_target: usize) -> DiffStats {
        DiffStats {
            total_base,
            total_target,
            added: self.added.len(),
            removed: self.removed.len(),
            updated: self.updated.len(),
            unchanged: total_base
                .saturating_sub(self.removed.len())
                .saturating_sub(self.updated.len()),
        }
    }
}

/// Count summary of a diff, relative to its input snapshot sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub total_base: usize,
    pub total_target: usize,
    pub added: usize,
    pub removed: usize,
    pub updated: usize,
    pub unchanged: usize,
}

/// Compute the difference between two modlist snapshots.
///
/// Deterministic and order-preserving; see the module docs for the exact
/// partition rules.
///
/// # Example
///
/// ```
/// use packnote::core::diff::diff;
/// use packnote::core::types::ModEntry;
///
/// let base = vec![ModEntry::new("JEI", "1.0")];
/// let target = vec![ModEntry::new("JEI", "1.1"), ModEntry::new("Waila", "1.0")];
///
/// let d = diff(&base, &target);
/// assert_eq!(d.added.len(), 1);
/// assert_eq!(d.added[0].name, "Waila");
/// assert_eq!(d.updated.len(), 1);
/// assert_eq!(d.updated[0].old_version, "1.0");
/// assert_eq!(d.updated[0].new_version, "1.1");
/// assert!(d.removed.is_empty());
/// ```
pub fn diff(base: &[ModEntry], target: &[ModEntry]) -> Diff {
    let base_map: HashMap<&str, &ModEntry> =
        base.iter().map(|m| (m.name.as_str(), m)).collect();
    let target_map: HashMap<&str, &ModEntry> =
        target.iter().map(|m| (m.name.as_str(), m)).collect();

    let added = target
        .iter()
        .filter(|m| !base_map.contains_key(m.name.as_str()))
        .cloned()
        .collect();

    let removed = base
        .iter()
        .filter(|m| !target_map.contains_key(m.name.as_str()))
        .cloned()
        .collect();

    // Iterate the target list (not the map) so output order is stable.
    // Duplicate names emit once thanks to the map lookup resolving to the
    // last occurrence; guard with a seen-check for the duplicate case.
    let mut updated = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for entry in target {
        let name = entry.name.as_str();
        if !seen.insert(name) {
            continue;
        }
        let (Some(base_entry), Some(target_entry)) =
            (base_map.get(name), target_map.get(name))
        else {
            continue;
        };
        if is_newer(&base_entry.version, &target_entry.version) {
            updated.push(ModUpdate {
                name: name.to_string(),
                old_version: base_entry.version.clone(),
                new_version: target_entry.version.clone(),
                entry: (*target_entry).clone(),
            });
        }
    }

    Diff {
        added,
        removed,
        updated,
    }
}
